//! Sharded k-mer counting on a bounded worker pool.
//!
//! Every requested k-mer length `k` is split into `k` shards, one per starting
//! offset in `0..k`. Shard `(k, offset)` visits the windows starting at
//! `offset`, `offset + k`, `offset + 2k`, ... so the `k` shards of a length
//! together visit every window of the sequence exactly once.
//!
//! Shards share the encoded sequence read-only and each owns its
//! [`FrequencyTable`], so the counting phase needs no locks. Results are
//! handed back through one channel per shard.

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::mpsc::{self, Receiver},
};

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::{
    error::KNucError,
    kmer::{KmerLength, PackedKmer},
    sequence::EncodedSequence,
    table::FrequencyTable,
};

#[cfg(feature = "tracing")]
use tracing::{debug, info, info_span};

/// Counts the non-overlapping `k`-windows of `sequence` that start at
/// `offset`, `offset + k`, `offset + 2k`, ...
///
/// Stops once fewer than `k` codes remain. An offset at or past the end of the
/// sequence yields an empty table.
///
/// # Examples
///
/// ```
/// use knucleotide::{kmer::{KmerLength, PackedKmer}, sequence::Encoder, shard::count_shard};
///
/// let seq = Encoder::encode(b"GGTGGTA")?;
/// let k = KmerLength::new(3)?;
/// let table = count_shard(&seq, 0, k);
///
/// // windows at 0 and 3: GGT, GGT
/// let ggt = PackedKmer::pack(Encoder::encode(b"GGT")?.codes(), 0, k);
/// assert_eq!(table.count_of(ggt), 2);
/// assert_eq!(table.total(), 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn count_shard(sequence: &EncodedSequence, offset: usize, k: KmerLength) -> FrequencyTable {
    let codes = sequence.codes();
    let mut table = FrequencyTable::new(k);
    if codes.len() < k.get() {
        return table;
    }

    let last_start = codes.len() - k.get();
    let mut start = offset;
    while start <= last_start {
        table.increment(PackedKmer::pack(codes, start, k).packed_bits());
        start += k.get();
    }
    table
}

/// Pending result of one shard.
#[derive(Debug)]
pub struct ShardHandle {
    k: KmerLength,
    offset: usize,
    receiver: Receiver<std::thread::Result<FrequencyTable>>,
}

impl ShardHandle {
    /// The k-mer length this shard counts.
    pub const fn k(&self) -> KmerLength {
        self.k
    }

    /// The starting offset of this shard.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Blocks until the shard has finished and returns its table.
    ///
    /// # Errors
    ///
    /// Returns [`KNucError::ShardFailed`] if the shard panicked or was dropped
    /// before producing a table.
    pub fn join(self) -> Result<FrequencyTable, KNucError> {
        match self.receiver.recv() {
            Ok(Ok(table)) => Ok(table),
            Ok(Err(payload)) => Err(self.failed(panic_message(payload.as_ref()))),
            Err(_) => Err(self.failed("shard exited without a result".to_string())),
        }
    }

    fn failed(&self, details: String) -> KNucError {
        KNucError::ShardFailed {
            k: self.k.get(),
            offset: self.offset,
            details,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "shard panicked".to_string()
    }
}

/// All scheduled shards, ordered by requested length and then by offset.
#[derive(Debug)]
pub struct Shards {
    handles: Vec<ShardHandle>,
}

impl Shards {
    /// Number of scheduled shards.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Returns `true` if no shards were scheduled.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// The individual handles, in scheduling order.
    pub fn into_handles(self) -> Vec<ShardHandle> {
        self.handles
    }

    /// Waits for every shard and returns their tables in scheduling order.
    ///
    /// # Errors
    ///
    /// Fails with the first [`KNucError::ShardFailed`] encountered; partial
    /// results are discarded.
    pub fn join_all(self) -> Result<Vec<FrequencyTable>, KNucError> {
        self.handles.into_iter().map(ShardHandle::join).collect()
    }
}

/// Spawns shard counting tasks onto a fixed-size worker pool.
pub struct ShardScheduler {
    pool: ThreadPool,
}

impl std::fmt::Debug for ShardScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardScheduler")
            .field("threads", &self.pool.current_num_threads())
            .finish()
    }
}

impl ShardScheduler {
    /// Builds a scheduler with `threads` workers, or one per available core
    /// when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`KNucError::ThreadPool`] if the pool cannot be created.
    pub fn new(threads: Option<usize>) -> Result<Self, KNucError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads.unwrap_or(0))
            .thread_name(|i| format!("knuc-shard-{i}"))
            .build()
            .map_err(|e| KNucError::ThreadPool {
                details: e.to_string(),
            })?;
        Ok(Self { pool })
    }

    /// Number of worker threads.
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Schedules `k` shards for every `k` in `lengths`.
    ///
    /// All lengths are validated before anything is spawned, so an oversized
    /// length never leaves half a run in flight.
    ///
    /// # Errors
    ///
    /// Returns [`KNucError::InvalidKmerLength`] for any length outside `1..=31`.
    pub fn schedule(
        &self,
        sequence: &EncodedSequence,
        lengths: &[usize],
    ) -> Result<Shards, KNucError> {
        let lengths = lengths
            .iter()
            .map(|&k| KmerLength::new(k))
            .collect::<Result<Vec<_>, _>>()?;

        #[cfg(feature = "tracing")]
        let _span = info_span!("schedule", bases = sequence.len()).entered();

        let mut handles = Vec::with_capacity(lengths.iter().map(|k| k.get()).sum());
        for k in lengths {
            for offset in 0..k.get() {
                handles.push(self.spawn(sequence.clone(), offset, k));
            }
        }

        #[cfg(feature = "tracing")]
        info!(
            shards = handles.len(),
            threads = self.threads(),
            "Scheduled shard counting"
        );

        Ok(Shards { handles })
    }

    fn spawn(&self, sequence: EncodedSequence, offset: usize, k: KmerLength) -> ShardHandle {
        let (sender, receiver) = mpsc::sync_channel(1);
        self.pool.spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| count_shard(&sequence, offset, k)));

            #[cfg(feature = "tracing")]
            {
                if let Ok(table) = &result {
                    debug!(k = k.get(), offset, distinct = table.len(), "Shard finished");
                }
            }

            // The receiver is gone only if the caller stopped waiting.
            let _ = sender.send(result);
        });
        ShardHandle {
            k,
            offset,
            receiver,
        }
    }
}

/// Counts `lengths` over `sequence` on a fresh pool and waits for every shard.
///
/// # Errors
///
/// Propagates scheduling and shard errors.
pub fn count_all(
    sequence: &EncodedSequence,
    lengths: &[usize],
    threads: Option<usize>,
) -> Result<Vec<FrequencyTable>, KNucError> {
    ShardScheduler::new(threads)?
        .schedule(sequence, lengths)?
        .join_all()
}
