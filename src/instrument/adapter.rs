//! Splicing hook call-outs into host method bodies.
//!
//! The adapter never rewrites a body in place. It records where each hook
//! sits relative to the body's instructions and hands the host an execution
//! plan: the original instructions interleaved with [`Step::Hook`] entries.
//! A host without any patches therefore runs exactly its own code.
//!
//! Attach failures disable the whole feature. The first failure is logged at
//! error severity, every patch already placed for that feature is withdrawn,
//! and later attach attempts for it are refused quietly.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use super::opcode::MethodBody;
use super::pattern::{Pattern, PatternError};

/// Identifies the call-out a splice site invokes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HookId(pub u16);

impl std::fmt::Display for HookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Hook({})", self.0)
    }
}

/// Where in a method a hook goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Splice {
    /// Before the first instruction.
    Prefix,
    /// After the body has finished.
    Postfix,
    /// Immediately before the first instruction of the matched span.
    Before(Pattern),
    /// Immediately after the last instruction of the matched span.
    After(Pattern),
}

/// A declarative splice request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HookPoint {
    /// Feature this splice belongs to. Failures disable the feature as a unit.
    pub feature: &'static str,
    /// Host method to patch.
    pub method: &'static str,
    pub splice: Splice,
    pub hook: HookId,
}

/// One entry of an execution plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Run the body's instruction at this index.
    Native(usize),
    /// Call out to the extension.
    Hook(HookId),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AttachError {
    #[error("{feature}: host method `{method}` is not available")]
    MissingMethod {
        feature: &'static str,
        method: String,
    },

    #[error("{feature}: no splice site in `{method}`: {source}")]
    NoSite {
        feature: &'static str,
        method: String,
        #[source]
        source: PatternError,
    },

    #[error("{feature} is disabled after an earlier attach failure")]
    Inert { feature: &'static str },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Anchor {
    Prefix,
    Before(usize),
    After(usize),
    Postfix,
}

#[derive(Clone, Debug)]
struct Patch {
    feature: &'static str,
    method: String,
    anchor: Anchor,
    hook: HookId,
}

/// Records splice sites and produces execution plans.
#[derive(Debug, Default)]
pub struct Instrumentation {
    patches: Vec<Patch>,
    inert: FxHashSet<&'static str>,
}

impl Instrumentation {
    /// Create an adapter with no patches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a hook point to `body`.
    ///
    /// `body` is `None` when the host no longer has the method at all.
    pub fn attach(
        &mut self,
        point: &HookPoint,
        body: Option<&MethodBody>,
    ) -> Result<(), AttachError> {
        if self.inert.contains(point.feature) {
            tracing::debug!(feature = point.feature, "skipping attach for disabled feature");
            return Err(AttachError::Inert {
                feature: point.feature,
            });
        }

        let result = match body {
            None => Err(AttachError::MissingMethod {
                feature: point.feature,
                method: point.method.to_string(),
            }),
            Some(body) => Self::locate(point, body),
        };

        match result {
            Ok(anchor) => {
                tracing::debug!(feature = point.feature, method = point.method, hook = %point.hook, "hook attached");
                self.patches.push(Patch {
                    feature: point.feature,
                    method: point.method.to_string(),
                    anchor,
                    hook: point.hook,
                });
                Ok(())
            }
            Err(err) => {
                tracing::error!(feature = point.feature, error = %err, "attach failed, feature disabled");
                self.inert.insert(point.feature);
                self.patches.retain(|p| p.feature != point.feature);
                Err(err)
            }
        }
    }

    /// Splice `hook` in front of the match of `pattern` in `body`.
    pub fn attach_before(
        &mut self,
        feature: &'static str,
        method: &'static str,
        body: Option<&MethodBody>,
        pattern: Pattern,
        hook: HookId,
    ) -> Result<(), AttachError> {
        self.attach(
            &HookPoint {
                feature,
                method,
                splice: Splice::Before(pattern),
                hook,
            },
            body,
        )
    }

    /// Splice `hook` right after the match of `pattern` in `body`.
    pub fn attach_after(
        &mut self,
        feature: &'static str,
        method: &'static str,
        body: Option<&MethodBody>,
        pattern: Pattern,
        hook: HookId,
    ) -> Result<(), AttachError> {
        self.attach(
            &HookPoint {
                feature,
                method,
                splice: Splice::After(pattern),
                hook,
            },
            body,
        )
    }

    /// Run `hook` before the first instruction of `body`.
    pub fn attach_prefix(
        &mut self,
        feature: &'static str,
        method: &'static str,
        body: Option<&MethodBody>,
        hook: HookId,
    ) -> Result<(), AttachError> {
        self.attach(
            &HookPoint {
                feature,
                method,
                splice: Splice::Prefix,
                hook,
            },
            body,
        )
    }

    /// Run `hook` once `body` has finished.
    pub fn attach_postfix(
        &mut self,
        feature: &'static str,
        method: &'static str,
        body: Option<&MethodBody>,
        hook: HookId,
    ) -> Result<(), AttachError> {
        self.attach(
            &HookPoint {
                feature,
                method,
                splice: Splice::Postfix,
                hook,
            },
            body,
        )
    }

    fn locate(point: &HookPoint, body: &MethodBody) -> Result<Anchor, AttachError> {
        let no_site = |source| AttachError::NoSite {
            feature: point.feature,
            method: body.name.clone(),
            source,
        };
        match &point.splice {
            Splice::Prefix => Ok(Anchor::Prefix),
            Splice::Postfix => Ok(Anchor::Postfix),
            Splice::Before(pattern) => pattern
                .find(&body.instructions)
                .map(|span| Anchor::Before(span.start))
                .map_err(no_site),
            Splice::After(pattern) => pattern
                .find(&body.instructions)
                .map(|span| Anchor::After(span.last()))
                .map_err(no_site),
        }
    }

    /// Build the execution plan for `body`.
    #[must_use]
    pub fn plan(&self, body: &MethodBody) -> Vec<Step> {
        let patches: SmallVec<[&Patch; 4]> = self
            .patches
            .iter()
            .filter(|p| p.method == body.name)
            .collect();

        let hooks_at = |anchor: Anchor| {
            patches
                .iter()
                .filter(move |p| p.anchor == anchor)
                .map(|p| Step::Hook(p.hook))
        };

        let mut steps = Vec::with_capacity(body.len() + patches.len());
        steps.extend(hooks_at(Anchor::Prefix));
        for index in 0..body.len() {
            steps.extend(hooks_at(Anchor::Before(index)));
            steps.push(Step::Native(index));
            steps.extend(hooks_at(Anchor::After(index)));
        }
        steps.extend(hooks_at(Anchor::Postfix));
        steps
    }

    /// Has `feature` been disabled by an attach failure?
    #[must_use]
    pub fn is_inert(&self, feature: &str) -> bool {
        self.inert.contains(feature)
    }

    /// Does `feature` have at least one live splice site?
    #[must_use]
    pub fn is_active(&self, feature: &str) -> bool {
        !self.is_inert(feature) && self.patches.iter().any(|p| p.feature == feature)
    }

    /// Number of live splice sites.
    #[must_use]
    pub fn patch_count(&self) -> usize {
        self.patches.len()
    }
}
