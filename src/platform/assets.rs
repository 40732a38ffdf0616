//! Asset gate: the game starts once every declared image has settled

/// Load state of a single asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetState {
    Pending,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    state: AssetState,
}

/// Counts declared assets and opens once all of them loaded or failed.
///
/// A failed asset does not hold the game back; the renderer draws a plain
/// shape in its place.
#[derive(Debug, Clone, Default)]
pub struct ReadyBarrier {
    entries: Vec<Entry>,
    opened: bool,
}

impl ReadyBarrier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asset; returns its index
    pub fn declare(&mut self, name: &str) -> usize {
        self.entries.push(Entry {
            name: name.to_string(),
            state: AssetState::Pending,
        });
        self.entries.len() - 1
    }

    /// Returns true exactly once: on the call that opens the barrier
    pub fn mark_loaded(&mut self, index: usize) -> bool {
        self.settle(index, AssetState::Loaded)
    }

    /// Returns true exactly once: on the call that opens the barrier
    pub fn mark_failed(&mut self, index: usize, reason: &str) -> bool {
        self.settle(index, AssetState::Failed(reason.to_string()))
    }

    fn settle(&mut self, index: usize, state: AssetState) -> bool {
        let Some(entry) = self.entries.get_mut(index) else {
            log::warn!("Unknown asset index {}", index);
            return false;
        };
        if entry.state != AssetState::Pending {
            return false;
        }
        match &state {
            AssetState::Loaded => log::info!("Loaded asset '{}'", entry.name),
            AssetState::Failed(reason) => {
                log::error!("Failed to load asset '{}': {}", entry.name, reason)
            }
            AssetState::Pending => {}
        }
        entry.state = state;

        if !self.opened && self.is_ready() {
            self.opened = true;
            return true;
        }
        false
    }

    pub fn state(&self, index: usize) -> Option<&AssetState> {
        self.entries.get(index).map(|e| &e.state)
    }

    pub fn is_loaded(&self, index: usize) -> bool {
        matches!(self.state(index), Some(AssetState::Loaded))
    }

    /// Hand `asset` back only if it loaded; pending and failed assets get
    /// the fallback shape instead
    pub fn usable<T>(&self, index: usize, asset: T) -> Option<T> {
        self.is_loaded(index).then_some(asset)
    }

    /// Every declared asset has loaded or failed
    pub fn is_ready(&self) -> bool {
        self.entries.iter().all(|e| e.state != AssetState::Pending)
    }

    pub fn pending(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.state == AssetState::Pending)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opens_after_all_loaded() {
        let mut barrier = ReadyBarrier::new();
        let seal = barrier.declare("seal.png");
        let tree = barrier.declare("tree.png");
        assert!(!barrier.is_ready());
        assert_eq!(barrier.pending(), 2);

        assert!(!barrier.mark_loaded(tree));
        assert!(barrier.mark_loaded(seal));
        assert!(barrier.is_ready());
        assert!(barrier.is_loaded(seal));
    }

    #[test]
    fn test_failure_settles_but_is_not_loaded() {
        let mut barrier = ReadyBarrier::new();
        let seal = barrier.declare("seal.png");
        let tree = barrier.declare("tree.png");
        barrier.mark_loaded(seal);
        assert!(barrier.mark_failed(tree, "404"));
        assert!(!barrier.is_loaded(tree));
        assert_eq!(barrier.state(tree), Some(&AssetState::Failed("404".into())));
    }

    #[test]
    fn test_failed_asset_is_never_drawn() {
        let mut barrier = ReadyBarrier::new();
        let seal = barrier.declare("seal.png");
        let tree = barrier.declare("tree.png");
        assert_eq!(barrier.usable(seal, "seal"), None);

        barrier.mark_loaded(seal);
        assert!(barrier.mark_failed(tree, "404"));
        assert_eq!(barrier.usable(seal, "seal"), Some("seal"));
        assert_eq!(barrier.usable(tree, "tree"), None);
        assert_eq!(barrier.usable(9, "ghost"), None);
    }

    #[test]
    fn test_opens_only_once() {
        let mut barrier = ReadyBarrier::new();
        let seal = barrier.declare("seal.png");
        assert!(barrier.mark_loaded(seal));
        // Duplicate events are ignored
        assert!(!barrier.mark_loaded(seal));
        assert!(!barrier.mark_failed(seal, "late error"));
        assert!(!barrier.mark_loaded(7));
    }
}
