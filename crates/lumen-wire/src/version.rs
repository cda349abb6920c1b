/// Opcode-table generation spoken by a deployment.
///
/// The two generations assign different code points to the same mnemonics
/// and are not wire-compatible; a deployment pins one end-to-end. The
/// protocol control bytes in [`crate::flags`] are shared by both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProtocolVersion {
    /// Original contiguous table. Lacks the filter, event and channel
    /// op families that forced the rebanding.
    V1,
    /// Current banded table with gaps reserved per op family.
    #[default]
    V2,
}

impl ProtocolVersion {
    /// Version label as it appears in tooling output.
    pub fn name(&self) -> &'static str {
        match self {
            ProtocolVersion::V1 => "v1",
            ProtocolVersion::V2 => "v2",
        }
    }
}

impl std::fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
