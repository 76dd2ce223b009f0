//! Trigger alias graph.
//!
//! `register(custom, target)` says "whenever `target` fires on a character,
//! `custom` fires on that character too". Chains are always flattened:
//! after `A -> B` and `B -> C`, resolving `A` gives `[C]`, and firing `C`
//! expands to both `B` and `A`. Cycles are refused at registration time.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::TriggerId;

type Targets = SmallVec<[TriggerId; 2]>;

/// Why an alias edge was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AliasRefusal {
    SelfAlias,
    Cycle,
}

/// What registering an edge changed, for logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AliasOutcome {
    Added,
    /// `custom` already aliased something; `target` was added to its set.
    Extended,
    /// `target` is itself an alias; `custom` was flattened onto its targets.
    Flattened,
}

/// Directed alias edges plus flattened lookup tables.
#[derive(Clone, Debug, Default)]
pub struct AliasGraph {
    /// Edges as registered.
    direct: FxHashMap<TriggerId, Targets>,
    /// Customs in first-registration order.
    order: Vec<TriggerId>,
    /// custom -> final (non-alias) targets.
    resolved: FxHashMap<TriggerId, Targets>,
    /// final target -> customs that fire with it, in registration order.
    expansions: FxHashMap<TriggerId, Targets>,
}

impl AliasGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the edge `custom -> target`.
    pub fn register(
        &mut self,
        custom: TriggerId,
        target: TriggerId,
    ) -> Result<AliasOutcome, AliasRefusal> {
        if custom == target {
            return Err(AliasRefusal::SelfAlias);
        }
        if self.reaches(target, custom) {
            return Err(AliasRefusal::Cycle);
        }

        let outcome = if self.direct.contains_key(&custom) {
            AliasOutcome::Extended
        } else if self.direct.contains_key(&target) {
            AliasOutcome::Flattened
        } else {
            AliasOutcome::Added
        };

        let edges = self.direct.entry(custom).or_default();
        if !edges.contains(&target) {
            edges.push(target);
        }
        if !self.order.contains(&custom) {
            self.order.push(custom);
        }
        self.rebuild();
        Ok(outcome)
    }

    /// Flat final targets of `custom`, empty if it is not an alias.
    #[must_use]
    pub fn resolve(&self, custom: TriggerId) -> &[TriggerId] {
        self.resolved.get(&custom).map_or(&[], |t| t.as_slice())
    }

    /// Customs to enqueue alongside a fired `trigger`.
    #[must_use]
    pub fn expand(&self, trigger: TriggerId) -> &[TriggerId] {
        self.expansions.get(&trigger).map_or(&[], |t| t.as_slice())
    }

    #[must_use]
    pub fn is_alias(&self, trigger: TriggerId) -> bool {
        self.direct.contains_key(&trigger)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Is `to` reachable from `from` along alias edges (or equal to it)?
    fn reaches(&self, from: TriggerId, to: TriggerId) -> bool {
        let mut stack: SmallVec<[TriggerId; 8]> = SmallVec::new();
        let mut seen: SmallVec<[TriggerId; 8]> = SmallVec::new();
        stack.push(from);
        while let Some(node) = stack.pop() {
            if node == to {
                return true;
            }
            if seen.contains(&node) {
                continue;
            }
            seen.push(node);
            if let Some(next) = self.direct.get(&node) {
                stack.extend(next.iter().copied());
            }
        }
        false
    }

    fn leaves(&self, node: TriggerId, out: &mut Targets) {
        match self.direct.get(&node) {
            Some(next) => {
                for &child in next {
                    self.leaves(child, out);
                }
            }
            None => {
                if !out.contains(&node) {
                    out.push(node);
                }
            }
        }
    }

    fn rebuild(&mut self) {
        self.resolved.clear();
        self.expansions.clear();
        for &custom in &self.order {
            let mut finals = Targets::new();
            self.leaves(custom, &mut finals);
            for &target in &finals {
                self.expansions.entry(target).or_default().push(custom);
            }
            self.resolved.insert(custom, finals);
        }
    }
}
