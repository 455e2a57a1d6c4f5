//! Navigator tree node

use std::cell::Cell;
use std::fmt;
use std::sync::{Arc, Weak};

use tracing::debug;

use crate::config::StateTransfer;
use crate::events::{Observable, SaveHook, Subscription};
use crate::index::{IndexElement, NodeKind};
use crate::state::NodeSnapshot;

/// `max_height` sentinel: let the content decide the height
pub const AUTO_HEIGHT: f64 = -1.0;

/// Shared inputs for building a forest
pub(crate) struct BuildContext<'a> {
    current_route: Option<&'a str>,
    save: &'a SaveHook,
    transfer: StateTransfer,
    selection_claimed: Cell<bool>,
}

impl<'a> BuildContext<'a> {
    pub(crate) fn new(
        current_route: Option<&'a str>,
        save: &'a SaveHook,
        transfer: StateTransfer,
    ) -> Self {
        Self {
            current_route,
            save,
            transfer,
            selection_claimed: Cell::new(false),
        }
    }

    /// Only the first matching node in forest order is selected
    fn claim_selection(&self, element: &IndexElement) -> bool {
        if self.selection_claimed.get() || !is_route_match(element, self.current_route) {
            return false;
        }
        self.selection_claimed.set(true);
        true
    }
}

/// One entry of the navigator tree
///
/// Nodes own their children; the parent link is weak and only used to walk
/// upwards. Selection is driven by the owning [`super::NavigatorTree`], which
/// selects the first node in forest order whose path is the current route.
pub struct NavigatorNode {
    kind: NodeKind,
    title: String,
    path: Option<String>,
    icon: Option<String>,
    deprecated: bool,
    children: Vec<Arc<NavigatorNode>>,
    parent: Weak<NavigatorNode>,
    selected: Observable<bool>,
    expanded: Observable<bool>,
    max_height: Observable<f64>,
}

impl NavigatorNode {
    pub(crate) fn build(
        element: &IndexElement,
        prior: Option<&NodeSnapshot>,
        parent: Weak<NavigatorNode>,
        context: &BuildContext<'_>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|this| {
            let selected = context.claim_selection(element);
            let prior_children = prior.map(|p| p.children.as_slice()).unwrap_or_default();
            let children: Vec<Arc<NavigatorNode>> = element
                .children
                .iter()
                .enumerate()
                .map(|(position, child)| {
                    let child_prior = context
                        .transfer
                        .lookup(prior_children, position, child.path.as_deref());
                    NavigatorNode::build(child, child_prior, this.clone(), context)
                })
                .collect();

            let reveals_selection = selected
                || children
                    .iter()
                    .any(|child| child.is_selected() || child.contains_selection());
            let expanded = prior.map(|p| p.expanded).unwrap_or(reveals_selection);
            let max_height = prior
                .and_then(|p| p.max_height)
                .unwrap_or(if expanded { AUTO_HEIGHT } else { 0.0 });

            Self {
                kind: element.kind.clone(),
                title: element.title.clone(),
                path: element.path.clone(),
                icon: element.icon.clone(),
                deprecated: element.deprecated.unwrap_or(false),
                children,
                parent,
                selected: Observable::new(selected, context.save.clone()),
                expanded: Observable::new(expanded, context.save.clone()),
                max_height: Observable::new(max_height, context.save.clone()),
            }
        })
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    pub fn children(&self) -> &[Arc<NavigatorNode>] {
        &self.children
    }

    /// Renderers hide the expand affordance for leaves
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn parent(&self) -> Option<Arc<NavigatorNode>> {
        self.parent.upgrade()
    }

    /// Strict ancestors, nearest first
    pub fn ancestors(&self) -> Vec<Arc<NavigatorNode>> {
        let mut ancestors = Vec::new();
        let mut current = self.parent();
        while let Some(node) = current {
            current = node.parent();
            ancestors.push(node);
        }
        ancestors
    }

    /// Group markers and path-less nodes can never be selected
    pub fn is_selectable(&self) -> bool {
        !self.kind.is_group_marker() && self.path.is_some()
    }

    pub(crate) fn matches_route(&self, route: &str) -> bool {
        self.is_selectable() && self.path.as_deref() == Some(route)
    }

    fn contains_selection(&self) -> bool {
        self.children
            .iter()
            .any(|child| child.is_selected() || child.contains_selection())
    }

    pub fn is_selected(&self) -> bool {
        self.selected.get()
    }

    /// Select or deselect; selecting expands the node (and its ancestors) first
    pub fn set_selected(&self, selected: bool) {
        if self.selected.get() == selected {
            return;
        }
        if selected && !self.is_selectable() {
            debug!("Ignoring selection of non-navigable node {}", self.title);
            return;
        }

        if selected {
            self.set_expanded(true);
        }
        self.selected.set(selected);
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded.get()
    }

    /// Expanding a node expands every ancestor first; collapsing leaves the
    /// rest of the tree alone.
    pub fn set_expanded(&self, expanded: bool) {
        if expanded {
            if let Some(parent) = self.parent() {
                parent.set_expanded(true);
            }
        }
        self.expanded.set(expanded);
    }

    pub fn toggle_expanded(&self) {
        self.set_expanded(!self.is_expanded());
    }

    /// Current height allocated to the children container, or [`AUTO_HEIGHT`]
    pub fn max_height(&self) -> f64 {
        self.max_height.get()
    }

    pub fn set_max_height(&self, max_height: f64) {
        self.max_height.set(max_height);
    }

    /// Pin an automatic height to the measured content height so a
    /// collapse transition has a concrete starting point.
    pub fn begin_height_transition(&self, measured_height: f64) {
        if self.max_height() == AUTO_HEIGHT {
            self.set_max_height(measured_height);
        }
    }

    /// Finish an expand/collapse transition: the container takes the
    /// measured content height when expanded and zero when collapsed.
    pub fn complete_height_transition(&self, measured_height: f64) {
        let target = if self.is_expanded() { measured_height } else { 0.0 };
        self.report_measured_height(target);
    }

    /// Store a measured height and shift every ancestor with a concrete
    /// height by the same delta.
    ///
    /// Nothing propagates when the previous height was automatic, since the
    /// delta is unknown.
    pub fn report_measured_height(&self, height: f64) {
        let previous = self.max_height();
        if !self.max_height.set(height) {
            return;
        }
        if previous == AUTO_HEIGHT {
            debug!("No height delta for {}: previous height was automatic", self.title);
            return;
        }

        let delta = height - previous;
        let mut current = self.parent();
        while let Some(ancestor) = current {
            let ancestor_height = ancestor.max_height();
            if ancestor_height != AUTO_HEIGHT {
                ancestor.set_max_height(ancestor_height + delta);
            }
            current = ancestor.parent();
        }
    }

    pub fn on_did_select<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&bool) + Send + Sync + 'static,
    {
        self.selected.subscribe(listener)
    }

    pub fn on_did_expand<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&bool) + Send + Sync + 'static,
    {
        self.expanded.subscribe(listener)
    }

    pub fn on_did_change_max_height<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&f64) + Send + Sync + 'static,
    {
        self.max_height.subscribe(listener)
    }

    /// Depth-first, pre-order walk of this subtree including `self`
    pub fn walk(self: &Arc<Self>, visit: &mut impl FnMut(&Arc<NavigatorNode>)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    pub(crate) fn to_snapshot(&self, record_paths: bool) -> NodeSnapshot {
        NodeSnapshot {
            path: if record_paths { self.path.clone() } else { None },
            expanded: self.is_expanded(),
            max_height: Some(self.max_height()),
            children: self
                .children
                .iter()
                .map(|child| child.to_snapshot(record_paths))
                .collect(),
        }
    }
}

impl fmt::Debug for NavigatorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigatorNode")
            .field("kind", &self.kind)
            .field("title", &self.title)
            .field("path", &self.path)
            .field("selected", &self.is_selected())
            .field("expanded", &self.is_expanded())
            .field("max_height", &self.max_height())
            .field("children", &self.children)
            .finish()
    }
}

fn is_route_match(element: &IndexElement, route: Option<&str>) -> bool {
    !element.kind.is_group_marker() && element.path.is_some() && element.path.as_deref() == route
}
