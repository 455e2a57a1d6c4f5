//! Navigator panel state
//!
//! [`NavigatorTree`] owns the forest of [`NavigatorNode`]s built from the
//! host's documentation index, together with the panel's scroll offset,
//! visibility and width.

mod node;

pub use node::{NavigatorNode, AUTO_HEIGHT};

use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::debug;

use crate::config::{StateTransfer, ViewStateConfig};
use crate::events::{Notifier, Observable, SaveHook, Subscription};
use crate::index::DocumentationIndex;
use crate::navigation::NavigationStack;
use crate::state::{NavigatorSnapshot, NodeSnapshot};
use node::BuildContext;

type Forest = RwLock<Vec<Arc<NavigatorNode>>>;

/// The navigator forest plus panel geometry
///
/// At most one node is selected: the first node in forest order whose path
/// is the current route. Language groups routinely share paths, so later
/// matches stay unselected.
pub struct NavigatorTree {
    history: Arc<NavigationStack>,
    save: SaveHook,
    transfer: StateTransfer,
    index: RwLock<Option<Arc<DocumentationIndex>>>,
    roots: Arc<Forest>,
    route_subscription: Subscription,
    index_changed: Notifier<Arc<DocumentationIndex>>,
    scroll: Observable<f64>,
    visible: Observable<bool>,
    width: Observable<f64>,
}

impl NavigatorTree {
    /// Restore the navigator from a snapshot; the forest is rebuilt from the
    /// persisted index without contacting the host.
    pub fn new(
        history: Arc<NavigationStack>,
        save: SaveHook,
        config: &ViewStateConfig,
        snapshot: NavigatorSnapshot,
    ) -> Self {
        let roots: Arc<Forest> = Arc::new(RwLock::new(Vec::new()));
        let forest = Arc::downgrade(&roots);
        let route_subscription = history.on_did_change_route(move |route| {
            if let Some(forest) = forest.upgrade() {
                select_route(&forest, route);
            }
        });

        let tree = Self {
            history,
            transfer: config.state_transfer,
            index: RwLock::new(snapshot.index.clone()),
            roots,
            route_subscription,
            index_changed: Notifier::new(),
            scroll: Observable::new(snapshot.scroll, save.clone()),
            visible: Observable::new(snapshot.visible, save.clone()),
            width: Observable::new(snapshot.width, save.clone()),
            save,
        };

        if let Some(index) = &snapshot.index {
            let roots = tree.build_roots(index, &snapshot.elements);
            *tree.roots.write() = roots;
        }
        tree
    }

    /// Replace the index and rebuild the forest, carrying over per-node
    /// state from the current forest.
    pub fn update_index(&self, index: DocumentationIndex) {
        let prior = self.element_snapshots();
        let index = Arc::new(index);
        let roots = self.build_roots(&index, &prior);
        debug!("Navigator rebuilt with {} root nodes", roots.len());

        *self.index.write() = Some(index.clone());
        let previous = std::mem::replace(&mut *self.roots.write(), roots);
        drop(previous);

        self.index_changed.notify(&index);
        self.save.save();
    }

    fn build_roots(
        &self,
        index: &DocumentationIndex,
        prior: &[NodeSnapshot],
    ) -> Vec<Arc<NavigatorNode>> {
        let current_route = self.history.current_route();
        let context = BuildContext::new(current_route.as_deref(), &self.save, self.transfer);

        index
            .root_elements()
            .enumerate()
            .map(|(position, element)| {
                let element_prior = self.transfer.lookup(prior, position, element.path.as_deref());
                NavigatorNode::build(element, element_prior, Weak::new(), &context)
            })
            .collect()
    }

    pub fn index(&self) -> Option<Arc<DocumentationIndex>> {
        self.index.read().clone()
    }

    /// Root nodes in index order
    pub fn roots(&self) -> Vec<Arc<NavigatorNode>> {
        self.roots.read().clone()
    }

    /// Every node, depth-first and pre-order
    pub fn walk(&self) -> Vec<Arc<NavigatorNode>> {
        let mut nodes = Vec::new();
        for root in self.roots() {
            root.walk(&mut |node| nodes.push(node.clone()));
        }
        nodes
    }

    pub fn selected_node(&self) -> Option<Arc<NavigatorNode>> {
        self.walk().into_iter().find(|node| node.is_selected())
    }

    pub fn find_by_path(&self, path: &str) -> Option<Arc<NavigatorNode>> {
        self.walk().into_iter().find(|node| node.path() == Some(path))
    }

    pub fn on_did_change_index<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Arc<DocumentationIndex>) + Send + Sync + 'static,
    {
        self.index_changed.subscribe(listener)
    }

    pub fn scroll(&self) -> f64 {
        self.scroll.get()
    }

    pub fn update_scroll(&self, scroll_y: f64) {
        self.scroll.set(scroll_y);
    }

    pub fn on_did_scroll<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&f64) + Send + Sync + 'static,
    {
        self.scroll.subscribe(listener)
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    pub fn update_visibility(&self, visible: bool) {
        self.visible.set(visible);
    }

    pub fn toggle_visibility(&self) {
        self.update_visibility(!self.is_visible());
    }

    pub fn on_did_change_visibility<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&bool) + Send + Sync + 'static,
    {
        self.visible.subscribe(listener)
    }

    pub fn width(&self) -> f64 {
        self.width.get()
    }

    pub fn update_width(&self, width: f64) {
        self.width.set(width);
    }

    pub fn on_did_change_width<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&f64) + Send + Sync + 'static,
    {
        self.width.subscribe(listener)
    }

    fn element_snapshots(&self) -> Vec<NodeSnapshot> {
        let record_paths = self.transfer.records_paths();
        self.roots
            .read()
            .iter()
            .map(|root| root.to_snapshot(record_paths))
            .collect()
    }

    pub fn to_snapshot(&self) -> NavigatorSnapshot {
        NavigatorSnapshot {
            index: self.index(),
            scroll: self.scroll(),
            visible: self.is_visible(),
            width: self.width(),
            elements: self.element_snapshots(),
        }
    }
}

impl Drop for NavigatorTree {
    fn drop(&mut self) {
        self.route_subscription.dispose();
    }
}

/// Deselect everything but the first node matching `route`, then select it
fn select_route(forest: &Forest, route: &str) {
    let roots = forest.read().clone();
    let mut nodes = Vec::new();
    for root in &roots {
        root.walk(&mut |node| nodes.push(node.clone()));
    }

    let winner = nodes.iter().position(|node| node.matches_route(route));
    for (position, node) in nodes.iter().enumerate() {
        if Some(position) != winner {
            node.set_selected(false);
        }
    }
    if let Some(position) = winner {
        nodes[position].set_selected(true);
    }
}

impl std::fmt::Debug for NavigatorTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigatorTree")
            .field("roots", &*self.roots.read())
            .field("scroll", &self.scroll())
            .field("visible", &self.is_visible())
            .field("width", &self.width())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{IndexElement, NodeKind};
    use crate::navigation::HistoryItem;
    use parking_lot::Mutex;

    fn index(roots: Vec<IndexElement>) -> DocumentationIndex {
        DocumentationIndex::with_language("swift", roots)
    }

    fn kit() -> DocumentationIndex {
        index(vec![
            IndexElement::new(NodeKind::Module, "Kit").with_path("/kit").with_children(vec![
                IndexElement::new(NodeKind::GroupMarker, "Structures"),
                IndexElement::new(NodeKind::Struct, "Foo").with_path("/kit/foo"),
            ]),
            IndexElement::new(NodeKind::Article, "Guide").with_path("/guide"),
        ])
    }

    fn tree(history: Arc<NavigationStack>, config: &ViewStateConfig) -> NavigatorTree {
        NavigatorTree::new(history, SaveHook::detached(), config, NavigatorSnapshot::empty(config))
    }

    #[test]
    fn test_languages_are_concatenated_in_order() {
        let history = Arc::new(NavigationStack::new(SaveHook::detached(), Vec::new()));
        let navigator = tree(history, &ViewStateConfig::default());

        let mut multi = kit();
        multi.interface_languages.insert(
            "occ".to_string(),
            vec![IndexElement::new(NodeKind::Module, "KitObjC").with_path("/kitobjc")],
        );
        navigator.update_index(multi);

        let titles: Vec<_> = navigator.roots().iter().map(|n| n.title().to_string()).collect();
        assert_eq!(titles, vec!["Kit", "Guide", "KitObjC"]);
    }

    #[test]
    fn test_update_index_notifies_once() {
        let history = Arc::new(NavigationStack::new(SaveHook::detached(), Vec::new()));
        let navigator = tree(history, &ViewStateConfig::default());
        let seen = Arc::new(Mutex::new(0));
        let counter = seen.clone();
        let _subscription = navigator.on_did_change_index(move |_| *counter.lock() += 1);

        navigator.update_index(kit());

        assert_eq!(*seen.lock(), 1);
        assert!(navigator.index().is_some());
    }

    #[test]
    fn test_rebuild_keeps_positional_state() {
        let history = Arc::new(NavigationStack::new(SaveHook::detached(), Vec::new()));
        let navigator = tree(history, &ViewStateConfig::default());
        navigator.update_index(kit());
        navigator.roots()[0].set_expanded(true);
        navigator.roots()[0].set_max_height(64.0);

        // Same shape, renamed nodes: state follows position.
        navigator.update_index(index(vec![
            IndexElement::new(NodeKind::Module, "Renamed").with_path("/renamed"),
            IndexElement::new(NodeKind::Article, "Guide").with_path("/guide"),
        ]));

        let roots = navigator.roots();
        assert!(roots[0].is_expanded());
        assert_eq!(roots[0].max_height(), 64.0);
        assert!(!roots[1].is_expanded());
    }

    #[test]
    fn test_rebuild_by_path_follows_moved_nodes() {
        let config = ViewStateConfig::default().with_state_transfer(StateTransfer::ByPath);
        let history = Arc::new(NavigationStack::new(SaveHook::detached(), Vec::new()));
        let navigator = tree(history, &config);
        navigator.update_index(kit());
        navigator.roots()[0].set_expanded(true);

        navigator.update_index(index(vec![
            IndexElement::new(NodeKind::Article, "Guide").with_path("/guide"),
            IndexElement::new(NodeKind::Module, "Kit").with_path("/kit"),
        ]));

        let roots = navigator.roots();
        assert!(!roots[0].is_expanded());
        assert!(roots[1].is_expanded());
    }

    #[test]
    fn test_rebuild_with_fewer_children_falls_back() {
        let history = Arc::new(NavigationStack::new(SaveHook::detached(), Vec::new()));
        let navigator = tree(history, &ViewStateConfig::default());
        navigator.update_index(index(vec![
            IndexElement::new(NodeKind::Article, "Only").with_path("/only"),
        ]));
        navigator.roots()[0].set_expanded(true);

        navigator.update_index(kit());

        let roots = navigator.roots();
        assert!(roots[0].is_expanded());
        assert!(!roots[1].is_expanded());
        assert_eq!(roots[1].max_height(), 0.0);
    }

    #[test]
    fn test_rebuilt_forest_tracks_selection() {
        let history = Arc::new(NavigationStack::new(
            SaveHook::detached(),
            vec![HistoryItem::new("/kit/foo")],
        ));
        let navigator = tree(history.clone(), &ViewStateConfig::default());
        navigator.update_index(kit());
        navigator.update_index(kit());

        let selected = navigator.selected_node().unwrap();
        assert_eq!(selected.path(), Some("/kit/foo"));

        history.set_current_route("/guide");
        let selected: Vec<_> = navigator.walk().into_iter().filter(|n| n.is_selected()).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].path(), Some("/guide"));
    }

    #[test]
    fn test_shared_paths_select_first_language_only() {
        let history = Arc::new(NavigationStack::new(SaveHook::detached(), Vec::new()));
        let navigator = tree(history.clone(), &ViewStateConfig::default());
        let mut multi = kit();
        multi.interface_languages.insert(
            "occ".to_string(),
            vec![IndexElement::new(NodeKind::Module, "Kit").with_path("/kit").with_children(vec![
                IndexElement::new(NodeKind::Struct, "Foo").with_path("/kit/foo"),
            ])],
        );
        navigator.update_index(multi);

        for route in ["/kit", "/kit/foo", "/guide", "/kit"] {
            history.set_current_route(route);
            let selected: Vec<_> =
                navigator.walk().into_iter().filter(|n| n.is_selected()).collect();
            assert_eq!(selected.len(), 1, "route {route}");
            assert!(Arc::ptr_eq(&selected[0], &navigator.find_by_path(route).unwrap()));
        }

        let occ_root = navigator.roots()[2].clone();
        assert!(!occ_root.is_selected());
        assert!(!occ_root.is_expanded());
    }

    #[test]
    fn test_shared_paths_select_once_at_build() {
        let history = Arc::new(NavigationStack::new(
            SaveHook::detached(),
            vec![HistoryItem::new("/kit/foo")],
        ));
        let navigator = tree(history, &ViewStateConfig::default());
        let mut multi = kit();
        multi.interface_languages.insert(
            "occ".to_string(),
            vec![IndexElement::new(NodeKind::Module, "Kit").with_path("/kit").with_children(vec![
                IndexElement::new(NodeKind::Struct, "Foo").with_path("/kit/foo"),
            ])],
        );

        navigator.update_index(multi);

        let selected: Vec<_> = navigator.walk().into_iter().filter(|n| n.is_selected()).collect();
        assert_eq!(selected.len(), 1);
        assert!(navigator.roots()[0].is_expanded());
        assert!(!navigator.roots()[2].is_expanded());
    }

    #[test]
    fn test_dropping_tree_releases_route_listener() {
        let history = Arc::new(NavigationStack::new(SaveHook::detached(), Vec::new()));
        let navigator = tree(history.clone(), &ViewStateConfig::default());
        navigator.update_index(kit());
        assert_eq!(history.route_listener_count(), 1);

        drop(navigator);

        assert_eq!(history.route_listener_count(), 0);
        assert!(history.set_current_route("/guide"));
    }

    #[test]
    fn test_panel_scalars_ignore_unchanged_values() {
        let history = Arc::new(NavigationStack::new(SaveHook::detached(), Vec::new()));
        let config = ViewStateConfig::default();
        let navigator = tree(history, &config);
        let widths = Arc::new(Mutex::new(Vec::new()));
        let sink = widths.clone();
        let _subscription = navigator.on_did_change_width(move |w| sink.lock().push(*w));

        navigator.update_width(config.default_navigator_width());
        navigator.update_width(300.0);
        navigator.update_scroll(120.0);

        assert_eq!(*widths.lock(), vec![300.0]);
        assert_eq!(navigator.scroll(), 120.0);
        assert!(navigator.is_visible());
    }
}
