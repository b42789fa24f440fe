use bitflags::bitflags;

bitflags! {
    /// Policies restricting which overlays may override an overlayable set.
    ///
    /// The string form (`"public|system"`) is parsed by the policy parser
    /// that ships with the resource compiler toolchain, not here.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PolicyFlags: u32 {
        const PUBLIC = 0x0000_0001;
        const SYSTEM_PARTITION = 0x0000_0002;
        const VENDOR_PARTITION = 0x0000_0004;
        const PRODUCT_PARTITION = 0x0000_0008;
        const SIGNATURE = 0x0000_0010;
        const ODM_PARTITION = 0x0000_0020;
        const OEM_PARTITION = 0x0000_0040;
        const ACTOR_SIGNATURE = 0x0000_0080;
        const CONFIG_SIGNATURE = 0x0000_0100;
    }
}

/// A named subset of a target package's resources that overlays are
/// permitted to override, with the policies that gate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayableInfo {
    pub name: String,
    pub actor: String,
    pub policies: PolicyFlags,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_bits() {
        let policies = PolicyFlags::PUBLIC | PolicyFlags::SYSTEM_PARTITION;
        assert_eq!(policies.bits(), 0x03);
        assert!(policies.contains(PolicyFlags::PUBLIC));
        assert!(!policies.contains(PolicyFlags::SIGNATURE));
    }
}
