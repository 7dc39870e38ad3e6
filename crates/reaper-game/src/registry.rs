//! Read-only access to machine-wide registry values.

/// Reads a string value under `HKEY_LOCAL_MACHINE`.
pub trait RegistryReader: Send + Sync {
    fn read_string(&self, subkey: &str, value: &str) -> Option<String>;
}

/// The Windows registry. Always empty on other platforms.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRegistry;

#[cfg(windows)]
impl RegistryReader for SystemRegistry {
    fn read_string(&self, subkey: &str, value: &str) -> Option<String> {
        use winreg::enums::HKEY_LOCAL_MACHINE;
        use winreg::RegKey;

        let hklm = RegKey::predef(HKEY_LOCAL_MACHINE);
        let key = hklm.open_subkey(subkey).ok()?;
        key.get_value::<String, _>(value).ok()
    }
}

#[cfg(not(windows))]
impl RegistryReader for SystemRegistry {
    fn read_string(&self, _subkey: &str, _value: &str) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(windows))]
    #[test]
    fn no_registry_off_windows() {
        assert!(SystemRegistry
            .read_string(r"SOFTWARE\Valve\Steam", "InstallPath")
            .is_none());
    }
}
