/// Unclaimed admission ticks kept by the gate
pub const TICK_BUFFER: usize = 1;

pub const NANOS_PER_SECOND: u64 = 1_000_000_000;
