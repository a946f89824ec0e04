//! Fork-join compression over contiguous input partitions.
//!
//! Two parallel regions run on scoped threads, one thread per partition:
//!
//! 1. **Count**: every worker fills a private frequency table for its
//!    partition, then adds it into the shared table under a mutex. Leaving
//!    the scope is the barrier before the tree is built.
//! 2. **Encode**: every worker encodes its partition, in order, into a
//!    private bit stream. Nothing is shared mutably in this phase.
//!
//! The private streams are then appended to the output one by one in
//! partition order on the calling thread. Partition `i` covers bytes that
//! precede partition `i + 1`, so the merged stream is the sequential one.

use std::ops::Range;
use std::sync::Mutex;
use std::thread;

use log::{debug, trace};

use super::stages::{allocate_stream, build_code_table, encode_into};
use super::{resolve_thread_count, Compressed};
use crate::bitstream::{capacity_for_bits, BitStream};
use crate::frequency::FrequencyTable;
use crate::huffman::CodeTable;
use crate::{PzError, PzResult};

/// Split `len` bytes into at most `workers` contiguous ranges of
/// `ceil(len / workers)` bytes; the last range may be shorter.
///
/// Returns no ranges for empty input and fewer than `workers` ranges when
/// there are not enough bytes to go around.
pub fn partition(len: usize, workers: usize) -> Vec<Range<usize>> {
    if len == 0 {
        return Vec::new();
    }
    let chunk = len.div_ceil(workers.max(1));
    (0..len)
        .step_by(chunk)
        .map(|start| start..(start + chunk).min(len))
        .collect()
}

/// Compresses a borrowed input with a fixed number of worker threads.
#[derive(Debug)]
pub struct ConcurrentCompressor<'a> {
    input: &'a [u8],
    workers: usize,
    table: CodeTable,
    output: BitStream,
}

impl<'a> ConcurrentCompressor<'a> {
    /// `workers` = 0 uses every available core.
    pub fn new(input: &'a [u8], workers: usize) -> Self {
        ConcurrentCompressor {
            input,
            workers: resolve_thread_count(workers),
            table: CodeTable::new(),
            output: BitStream::default(),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// The byte range each worker owns in both parallel regions.
    pub fn partitions(&self) -> Vec<Range<usize>> {
        partition(self.input.len(), self.workers)
    }

    /// Byte frequencies of the whole input, counted in parallel.
    pub fn count_frequencies(&self) -> PzResult<FrequencyTable> {
        count_parallel(self.input, &self.partitions()).map(|(merged, _)| merged)
    }

    /// Run every stage, replacing any previous table and output.
    ///
    /// Empty input leaves an empty table and a zero-length output.
    pub fn digest(&mut self) -> PzResult<()> {
        self.table = CodeTable::new();
        self.output = BitStream::default();

        let parts = self.partitions();
        if parts.is_empty() {
            return Ok(());
        }

        let (freq, locals) = count_parallel(self.input, &parts)?;
        debug!(
            "parallel: counted {} bytes, {} distinct, {} partitions",
            freq.total,
            freq.used,
            parts.len()
        );

        let table = build_code_table(&freq)?;
        let streams = encode_parallel(self.input, &parts, &locals, &table)?;

        let mut output = BitStream::new(capacity_for_bits(freq.encoded_bits(&table)))?;
        for stream in &streams {
            output.append(stream)?;
        }
        debug!("parallel: merged {} streams, {} bits", streams.len(), output.bit_len());

        self.table = table;
        self.output = output;
        Ok(())
    }

    pub fn code_table(&self) -> &CodeTable {
        &self.table
    }

    pub fn output(&self) -> &BitStream {
        &self.output
    }

    pub fn finish(self) -> Compressed {
        self.output.into()
    }
}

/// Count each partition on its own thread.
///
/// Returns the merged table together with every worker's private table, in
/// partition order.
pub(crate) fn count_parallel(
    input: &[u8],
    parts: &[Range<usize>],
) -> PzResult<(FrequencyTable, Vec<FrequencyTable>)> {
    let shared = Mutex::new(FrequencyTable::new());

    let locals = thread::scope(|scope| {
        let handles: Vec<_> = parts
            .iter()
            .enumerate()
            .map(|(worker, range)| {
                let chunk = &input[range.clone()];
                let shared = &shared;
                scope.spawn(move || -> PzResult<FrequencyTable> {
                    let mut local = FrequencyTable::new();
                    local.count(chunk);
                    trace!("worker {worker}: counted {} bytes", chunk.len());
                    shared
                        .lock()
                        .map_err(|_| PzError::WorkerPanicked)?
                        .merge(&local);
                    Ok(local)
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or(Err(PzError::WorkerPanicked)))
            .collect::<PzResult<Vec<_>>>()
    })?;

    let merged = shared.into_inner().map_err(|_| PzError::WorkerPanicked)?;
    Ok((merged, locals))
}

/// Encode each partition into a private stream sized from that partition's
/// own counts.
fn encode_parallel(
    input: &[u8],
    parts: &[Range<usize>],
    locals: &[FrequencyTable],
    table: &CodeTable,
) -> PzResult<Vec<BitStream>> {
    thread::scope(|scope| {
        let handles: Vec<_> = parts
            .iter()
            .zip(locals)
            .enumerate()
            .map(|(worker, (range, local))| {
                let chunk = &input[range.clone()];
                scope.spawn(move || -> PzResult<BitStream> {
                    let mut stream = allocate_stream(local, table)?;
                    encode_into(chunk, table, &mut stream)?;
                    trace!("worker {worker}: encoded {} bits", stream.bit_len());
                    Ok(stream)
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or(Err(PzError::WorkerPanicked)))
            .collect()
    })
}
