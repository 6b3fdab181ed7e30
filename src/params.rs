//! Blocking parameters and packing policy.
//!
//! The block sizes control how much of each operand is resident in cache
//! while the microkernels run. They are plain data: every optimization
//! stage is just a different `BlockingParams` value handed to the same
//! scheduler, not a separate code path.

use crate::kernels::{MR, NR};

/// How operand panels get packed during a GEMM call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackingPolicy {
    /// Pack a whole MC×KC A block (and all B strips of the current
    /// KC×NC block) before any microkernel reads from them. Simple and
    /// easy to reason about; the packed data may have cooled off in
    /// cache by the time the last tiles read it.
    Eager,
    /// Pack each MR×KC slice of A immediately before its sweep across
    /// the N strips, and capture B strips inside the wide kernel on
    /// their first read. Packed data is still cache-hot when consumed;
    /// the copy overlaps with neighbouring compute.
    Lazy,
}

/// Cache-block sizes for one GEMM invocation.
///
/// `mc`/`kc`/`nc` are the extents of the A panel (mc × kc) and B panel
/// (kc × nc) that stay packed in cache. The microkernel tile shape
/// (MR×NR) is fixed by the kernel family and is not part of this
/// struct - see [`crate::kernels`].
///
/// Changing these values never changes the computed product beyond
/// floating-point rounding; they are pure performance knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockingParams {
    /// Rows of the packed A panel (M blocking).
    pub mc: usize,
    /// Shared reduction-dimension extent of both panels (K blocking).
    pub kc: usize,
    /// Columns of the packed B panel (N blocking).
    pub nc: usize,
    /// When operands get packed.
    pub policy: PackingPolicy,
}

impl BlockingParams {
    /// Baseline blocking: panels of 512×64 / 64×512 floats (128 KB
    /// each), packed eagerly. Used by the early optimization stages.
    pub const DEFAULT: BlockingParams = BlockingParams {
        mc: 512,
        kc: 64,
        nc: 512,
        policy: PackingPolicy::Eager,
    };

    /// Tuned blocking: 1024×64 panels (256 KB, fits L2) with lazy
    /// packing. KC stays small so one 6×64 A slice fits in L1.
    pub const TUNED: BlockingParams = BlockingParams {
        mc: 1024,
        kc: 64,
        nc: 1024,
        policy: PackingPolicy::Lazy,
    };

    /// Custom block sizes with the given policy.
    pub const fn new(mc: usize, kc: usize, nc: usize, policy: PackingPolicy) -> Self {
        BlockingParams { mc, kc, nc, policy }
    }

    /// Check the invariants the scheduler relies on. Violations are
    /// programmer errors and panic immediately.
    pub fn validate(&self) {
        assert!(self.kc > 0, "KC must be positive, got {}", self.kc);
        assert!(
            self.mc >= MR,
            "MC ({}) must be at least the kernel tile height MR ({})",
            self.mc,
            MR
        );
        assert!(
            self.nc >= NR,
            "NC ({}) must be at least the kernel tile width NR ({})",
            self.nc,
            NR
        );
    }
}

impl Default for BlockingParams {
    fn default() -> Self {
        Self::TUNED
    }
}
