//! Configuration for pool sizing.
//!
//! [`PoolConfig`] fixes the two immutable parameters of a [`BufferPool`]:
//!
//! - `buffer_size` - capacity in bytes of every buffer in the pool
//! - `capacity` - maximum number of buffers held at once
//!
//! Worst-case memory is bounded at `capacity * buffer_size`.
//!
//! # Example
//!
//! ```
//! use stagepool::PoolConfig;
//!
//! // 4 MiB buffers, at most 16 of them
//! let config = PoolConfig::new(4 * 1024 * 1024, 16)?;
//! assert_eq!(config.max_memory(), 64 * 1024 * 1024);
//! # Ok::<(), stagepool::PoolError>(())
//! ```
//!
//! [`BufferPool`]: crate::BufferPool

use crate::error::PoolError;

/// Default buffer size (4 MiB), matching a typical chunk size for
/// streaming uploads to object/block storage.
pub const DEFAULT_BUFFER_SIZE: usize = 4 * 1024 * 1024;

/// Default pool capacity in buffers.
pub const DEFAULT_CAPACITY: usize = 8;

/// Sizing configuration for a [`BufferPool`](crate::BufferPool).
///
/// Both parameters are immutable once the pool is constructed. `capacity`
/// is a hard bound: the pool panics rather than allocate past it, because
/// exceeding it means the caller staged more concurrent unacknowledged
/// data than the pool was sized for.
///
/// # Example
///
/// ```
/// use stagepool::PoolConfig;
///
/// // Validated constructor
/// let config = PoolConfig::new(1024, 4)?;
///
/// // Builder pattern (validate separately)
/// let config = PoolConfig::default()
///     .with_buffer_size(8192)
///     .with_capacity(32);
/// assert!(config.validate().is_ok());
/// # Ok::<(), stagepool::PoolError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolConfig {
    /// Capacity in bytes of every buffer in the pool.
    buffer_size: usize,

    /// Maximum number of buffers the pool may hold simultaneously.
    capacity: usize,
}

impl PoolConfig {
    /// Creates a new configuration with the given buffer size and capacity.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] if either parameter is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use stagepool::PoolConfig;
    ///
    /// let config = PoolConfig::new(1024, 4)?;
    /// assert_eq!(config.buffer_size(), 1024);
    /// assert_eq!(config.capacity(), 4);
    /// # Ok::<(), stagepool::PoolError>(())
    /// ```
    pub fn new(buffer_size: usize, capacity: usize) -> Result<Self, PoolError> {
        if buffer_size == 0 {
            return Err(PoolError::InvalidConfig {
                message: "buffer_size must be non-zero",
            });
        }
        if capacity == 0 {
            return Err(PoolError::InvalidConfig {
                message: "capacity must be non-zero",
            });
        }
        Ok(Self {
            buffer_size,
            capacity,
        })
    }

    /// Sets the buffer size.
    ///
    /// Note: This does not validate the configuration. Use
    /// [`PoolConfig::validate`] to check if the configuration is valid.
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Sets the pool capacity (maximum number of buffers).
    ///
    /// Note: This does not validate the configuration. Use
    /// [`PoolConfig::validate`] to check if the configuration is valid.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Returns the capacity in bytes of every buffer.
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Returns the maximum number of buffers the pool may hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the worst-case memory held by the pool, in bytes.
    pub fn max_memory(&self) -> usize {
        self.buffer_size * self.capacity
    }

    /// Validates the current configuration.
    ///
    /// Returns an error if the configuration is invalid.
    ///
    /// # Example
    ///
    /// ```
    /// use stagepool::PoolConfig;
    ///
    /// let config = PoolConfig::default().with_capacity(0);
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), PoolError> {
        Self::new(self.buffer_size, self.capacity).map(|_| ())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            capacity: DEFAULT_CAPACITY,
        }
    }
}
