//! Target mode to selector bindings.

use rustc_hash::FxHashMap;

use crate::core::{ExtensionConfig, RegistrationError};

use super::{SelectorKind, TargetModeFlags, TargetModeId, TargetSelector};

/// Registry for custom target modes.
///
/// Filled at startup, read-only afterwards. A mode has at most one selector.
#[derive(Debug)]
pub struct TargetSelectorRegistry {
    reserved_max: u16,
    selectors: FxHashMap<TargetModeId, TargetSelector>,
    /// Kinds content declared for modes ahead of binding.
    declared: FxHashMap<TargetModeId, SelectorKind>,
}

impl TargetSelectorRegistry {
    pub fn new(config: &ExtensionConfig) -> Self {
        Self::with_reserved_max(config.reserved_target_mode_max)
    }

    pub fn with_reserved_max(reserved_max: u16) -> Self {
        Self {
            reserved_max,
            selectors: FxHashMap::default(),
            declared: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn is_reserved(&self, mode: TargetModeId) -> bool {
        mode.0 <= self.reserved_max
    }

    fn check_custom(&self, mode: TargetModeId) -> Result<(), RegistrationError> {
        if self.is_reserved(mode) {
            let err = RegistrationError::ReservedTargetMode {
                mode,
                reserved_max: self.reserved_max,
            };
            tracing::error!(error = %err, "refusing to redefine a host target mode");
            return Err(err);
        }
        Ok(())
    }

    /// Record that `mode` must be bound to a `kind` selector.
    ///
    /// Content data declares this when it names the mode, before code
    /// binds the selector.
    pub fn declare_kind(&mut self, mode: TargetModeId, kind: SelectorKind) -> Result<(), RegistrationError> {
        self.check_custom(mode)?;
        if let Some(bound) = self.selectors.get(&mode) {
            self.check_kind(mode, kind, bound.kind())?;
        }
        self.declared.insert(mode, kind);
        Ok(())
    }

    fn check_kind(
        &self,
        mode: TargetModeId,
        expected: SelectorKind,
        found: SelectorKind,
    ) -> Result<(), RegistrationError> {
        if expected != found {
            let err = RegistrationError::IncompatibleSelector { mode, expected, found };
            tracing::error!(error = %err, "selector kind mismatch");
            return Err(err);
        }
        Ok(())
    }

    /// Bind `selector` to `mode`.
    pub fn bind_selector(
        &mut self,
        mode: TargetModeId,
        selector: TargetSelector,
    ) -> Result<(), RegistrationError> {
        self.check_custom(mode)?;
        if self.selectors.contains_key(&mode) {
            let err = RegistrationError::DuplicateSelector { mode };
            tracing::error!(error = %err, "duplicate target mode selector");
            return Err(err);
        }
        if let Some(&expected) = self.declared.get(&mode) {
            self.check_kind(mode, expected, selector.kind())?;
        }
        tracing::debug!(%mode, kind = %selector.kind(), "target mode selector bound");
        self.selectors.insert(mode, selector);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, mode: TargetModeId) -> Option<&TargetSelector> {
        self.selectors.get(&mode)
    }

    #[must_use]
    pub fn kind(&self, mode: TargetModeId) -> Option<SelectorKind> {
        self.get(mode).map(TargetSelector::kind)
    }

    #[must_use]
    pub fn flags(&self, mode: TargetModeId) -> Option<TargetModeFlags> {
        self.get(mode).map(TargetSelector::flags)
    }

    /// Is `mode` a custom card-targeting mode?
    #[must_use]
    pub fn is_card_mode(&self, mode: TargetModeId) -> bool {
        self.kind(mode) == Some(SelectorKind::Card)
    }

    /// Is `mode` a custom character-targeting mode?
    #[must_use]
    pub fn is_entity_mode(&self, mode: TargetModeId) -> bool {
        self.kind(mode) == Some(SelectorKind::Entity)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }
}
