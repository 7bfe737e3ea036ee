use std::sync::atomic::{AtomicU64, Ordering};

/// Connection-wide statistics
///
/// Thread-safe counters for every operation the mapping layer performs.
/// Uses atomic counters for lock-free updates.
#[derive(Debug, Default)]
pub struct Statistics {
    // Reads
    pub num_reads: AtomicU64,
    pub num_slice_requests: AtomicU64,
    pub num_units_read: AtomicU64,

    // Writes
    pub num_writes: AtomicU64,
    pub num_mutations: AtomicU64,
    pub num_columns_written: AtomicU64,
    pub bytes_written: AtomicU64,
    pub num_deletes: AtomicU64,

    // Connection and schema
    pub num_keyspace_selections: AtomicU64,
    pub num_schema_changes: AtomicU64,

    // Error counts
    pub num_errors: AtomicU64,
}

impl Statistics {
    pub fn new() -> Self {
        Statistics::default()
    }

    #[inline]
    pub fn record_read(&self) {
        self.num_reads.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_slice_request(&self, units: u64) {
        self.num_slice_requests.fetch_add(1, Ordering::Relaxed);
        self.num_units_read.fetch_add(units, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_write(&self, mutations: u64, columns: u64, bytes: u64) {
        self.num_writes.fetch_add(1, Ordering::Relaxed);
        self.num_mutations.fetch_add(mutations, Ordering::Relaxed);
        self.num_columns_written
            .fetch_add(columns, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_delete(&self, mutations: u64) {
        self.num_deletes.fetch_add(1, Ordering::Relaxed);
        self.num_mutations.fetch_add(mutations, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_keyspace_selection(&self) {
        self.num_keyspace_selections
            .fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_schema_change(&self) {
        self.num_schema_changes.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_error(&self) {
        self.num_errors.fetch_add(1, Ordering::Relaxed);
    }

    // Getters (snapshot values)
    pub fn num_reads(&self) -> u64 {
        self.num_reads.load(Ordering::Relaxed)
    }

    pub fn num_slice_requests(&self) -> u64 {
        self.num_slice_requests.load(Ordering::Relaxed)
    }

    pub fn num_units_read(&self) -> u64 {
        self.num_units_read.load(Ordering::Relaxed)
    }

    pub fn num_writes(&self) -> u64 {
        self.num_writes.load(Ordering::Relaxed)
    }

    pub fn num_mutations(&self) -> u64 {
        self.num_mutations.load(Ordering::Relaxed)
    }

    pub fn num_columns_written(&self) -> u64 {
        self.num_columns_written.load(Ordering::Relaxed)
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }

    pub fn num_deletes(&self) -> u64 {
        self.num_deletes.load(Ordering::Relaxed)
    }

    pub fn num_keyspace_selections(&self) -> u64 {
        self.num_keyspace_selections.load(Ordering::Relaxed)
    }

    pub fn num_schema_changes(&self) -> u64 {
        self.num_schema_changes.load(Ordering::Relaxed)
    }

    pub fn num_errors(&self) -> u64 {
        self.num_errors.load(Ordering::Relaxed)
    }

    /// Average number of slice requests per read
    pub fn fan_out(&self) -> f64 {
        let requests = self.num_slice_requests.load(Ordering::Relaxed) as f64;
        let reads = self.num_reads.load(Ordering::Relaxed) as f64;
        if reads > 0.0 { requests / reads } else { 0.0 }
    }

    /// Reset all statistics to zero
    pub fn reset(&self) {
        self.num_reads.store(0, Ordering::Relaxed);
        self.num_slice_requests.store(0, Ordering::Relaxed);
        self.num_units_read.store(0, Ordering::Relaxed);
        self.num_writes.store(0, Ordering::Relaxed);
        self.num_mutations.store(0, Ordering::Relaxed);
        self.num_columns_written.store(0, Ordering::Relaxed);
        self.bytes_written.store(0, Ordering::Relaxed);
        self.num_deletes.store(0, Ordering::Relaxed);
        self.num_keyspace_selections.store(0, Ordering::Relaxed);
        self.num_schema_changes.store(0, Ordering::Relaxed);
        self.num_errors.store(0, Ordering::Relaxed);
    }

    /// Get a formatted statistics report
    pub fn report(&self) -> String {
        format!(
            "Connection Statistics:\n\
            \n\
            Reads:\n\
            - Reads:          {}\n\
            - Slice requests: {} ({:.2} per read)\n\
            - Units returned: {}\n\
            \n\
            Writes:\n\
            - Writes:          {}\n\
            - Deletes:         {}\n\
            - Mutations:       {}\n\
            - Columns written: {}\n\
            - Bytes written:   {} ({:.2} MB)\n\
            \n\
            Connection:\n\
            - Keyspace selections: {}\n\
            - Schema changes:      {}\n\
            - Errors:              {}\n",
            self.num_reads(),
            self.num_slice_requests(),
            self.fan_out(),
            self.num_units_read(),
            self.num_writes(),
            self.num_deletes(),
            self.num_mutations(),
            self.num_columns_written(),
            self.bytes_written(),
            self.bytes_written() as f64 / (1024.0 * 1024.0),
            self.num_keyspace_selections(),
            self.num_schema_changes(),
            self.num_errors(),
        )
    }
}
