use cohsim_cache::common::{Addr, DataBlock};
use cohsim_cache::config::{CacheMemoryConfig, DEFAULT_SYSTEM_BLOCK_SIZE};
use cohsim_cache::{AccessPermission, CacheEntry, CacheMemory};
use tracing_subscriber::EnvFilter;

/// Line size of the small test cache.
pub const LINE: u64 = 64;

/// Installs a test-writer subscriber filtered by `RUST_LOG`; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// 256 bytes, 64-byte lines, 2 ways: 2 sets selected by address bit 6.
pub fn small_config() -> CacheMemoryConfig {
    CacheMemoryConfig {
        size_bytes: 256,
        assoc: 2,
        block_size: 64,
        ..CacheMemoryConfig::default()
    }
}

/// Builds a cache from `config` with the default system block size.
pub fn build(config: &CacheMemoryConfig) -> CacheMemory {
    init_tracing();
    CacheMemory::new(config, DEFAULT_SYSTEM_BLOCK_SIZE).expect("valid test geometry")
}

/// Builds the small LRU test cache.
pub fn small_cache() -> CacheMemory {
    build(&small_config())
}

/// Line address with the given set index and tag in the small cache.
pub const fn line(set: u64, tag: u64) -> Addr {
    (tag << 7) | (set << 6)
}

/// Fresh entry with a zeroed line payload.
pub fn entry() -> CacheEntry {
    CacheEntry::new(DataBlock::new(LINE as usize))
}

/// Allocates `addr` at `now` and sets its permission.
pub fn install(cache: &mut CacheMemory, addr: Addr, permission: AccessPermission, now: u64) {
    cache
        .allocate(addr, entry(), now)
        .expect("allocate")
        .set_permission(permission);
}
