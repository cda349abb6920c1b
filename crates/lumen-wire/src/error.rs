/// Errors that can occur while laying out wire payloads.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The MTU leaves no room for chunk bytes after the frame header.
    #[error("mtu too small ({mtu} bytes, header alone is {header})")]
    MtuTooSmall { mtu: usize, header: usize },

    /// The payload does not fit the frame header's 32-bit length fields.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, WireError>;
