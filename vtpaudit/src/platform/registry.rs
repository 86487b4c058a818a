//! Registry of platform definitions used by an audit run.

use indexmap::IndexMap;

use super::VendorFamily;
use super::definition::PlatformDefinition;

/// Registry for platform definitions, keyed by vendor family.
///
/// Iteration follows registration order, which is the order families are
/// audited in.
#[derive(Debug, Default)]
pub struct PlatformRegistry {
    platforms: IndexMap<VendorFamily, PlatformDefinition>,
}

impl PlatformRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            platforms: IndexMap::new(),
        }
    }

    /// Create a registry with the built-in definition of every family.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for family in VendorFamily::ALL {
            registry.register(family.platform());
        }
        registry
    }

    /// Register a platform definition, returning the one it replaces.
    pub fn register(&mut self, platform: PlatformDefinition) -> Option<PlatformDefinition> {
        self.platforms.insert(platform.family, platform)
    }

    /// Get the definition for a family.
    pub fn get(&self, family: VendorFamily) -> Option<&PlatformDefinition> {
        self.platforms.get(&family)
    }

    /// Check if a family is registered.
    pub fn contains(&self, family: VendorFamily) -> bool {
        self.platforms.contains_key(&family)
    }

    /// Registered definitions, in registration order.
    pub fn platforms(&self) -> impl Iterator<Item = &PlatformDefinition> {
        self.platforms.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry() {
        let registry = PlatformRegistry::builtin();
        assert!(registry.contains(VendorFamily::CiscoNxos));
        assert!(registry.contains(VendorFamily::CiscoIos));

        let order: Vec<_> = registry.platforms().map(|p| p.family).collect();
        assert_eq!(order, VendorFamily::ALL);
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = PlatformRegistry::new();
        assert!(registry.register(PlatformDefinition::new(VendorFamily::CiscoIos)).is_none());
        assert!(registry.register(VendorFamily::CiscoIos.platform()).is_some());
        assert_eq!(registry.get(VendorFamily::CiscoIos).unwrap().chain.len(), 1);
        assert!(registry.get(VendorFamily::CiscoNxos).is_none());
    }
}
