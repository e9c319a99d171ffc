use serde::Serialize;
use serde_json::json;
use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::{Rc, Weak},
    sync::atomic::{AtomicU64, Ordering},
};

use crate::{config::LogLevel, telemetry::log_event};

pub const MARKER_ATTR: &str = "data-cursor";
pub const SIZE_ATTR: &str = "data-cursor-size";
pub const AURA_ATTR: &str = "data-cursor-aura";
pub const LABEL_ATTR: &str = "data-cursor-label";

pub const IDLE_CORE_SIZE: u32 = 18;
pub const IDLE_AURA_SIZE: u32 = 96;
pub const TARGET_CORE_SIZE: u32 = 14;
pub const TARGET_AURA_SIZE: u32 = 128;

const SIZE_BOUNDS: (u32, u32) = (1, 1_024);

static TARGET_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TargetId(u64);

impl TargetId {
    pub fn next() -> Self {
        Self(TARGET_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Cursor overrides declared by a hoverable element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TargetDescriptor {
    pub core: u32,
    pub aura: u32,
    pub label: String,
}

impl Default for TargetDescriptor {
    fn default() -> Self {
        Self {
            core: TARGET_CORE_SIZE,
            aura: TARGET_AURA_SIZE,
            label: String::new(),
        }
    }
}

impl TargetDescriptor {
    pub fn from_attributes(size: Option<&str>, aura: Option<&str>, label: Option<&str>) -> Self {
        Self {
            core: parse_attr_u32_with_bounds(size, TARGET_CORE_SIZE, SIZE_BOUNDS),
            aura: parse_attr_u32_with_bounds(aura, TARGET_AURA_SIZE, SIZE_BOUNDS),
            label: label.unwrap_or_default().to_string(),
        }
    }
}

/// Reads an integer the way `parseInt` does: leading digits win, trailing junk is
/// ignored. Anything unparseable or out of bounds yields `default`.
fn parse_attr_u32_with_bounds(value: Option<&str>, default: u32, bounds: (u32, u32)) -> u32 {
    value
        .and_then(leading_integer)
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn leading_integer(raw: &str) -> Option<u32> {
    let trimmed = raw.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());

    unsigned[..digits_end].parse::<u32>().ok()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CursorAppearance {
    pub hovering: bool,
    pub core: u32,
    pub aura: u32,
    pub label: String,
}

impl CursorAppearance {
    pub fn idle() -> Self {
        Self {
            hovering: false,
            core: IDLE_CORE_SIZE,
            aura: IDLE_AURA_SIZE,
            label: String::new(),
        }
    }

    pub fn hovering(descriptor: &TargetDescriptor) -> Self {
        Self {
            hovering: true,
            core: descriptor.core,
            aura: descriptor.aura,
            label: descriptor.label.clone(),
        }
    }
}

/// Known interaction targets and the one currently under the pointer.
///
/// Mutating calls return the new cursor appearance when it changed.
#[derive(Default)]
pub struct TargetRegistry {
    targets: HashMap<TargetId, TargetDescriptor>,
    hovered: Option<TargetId>,
}

impl TargetRegistry {
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_registered(&self, target: TargetId) -> bool {
        self.targets.contains_key(&target)
    }

    pub fn appearance(&self) -> CursorAppearance {
        self.hovered
            .and_then(|target| self.targets.get(&target))
            .map(CursorAppearance::hovering)
            .unwrap_or_else(CursorAppearance::idle)
    }

    pub fn register(&mut self, target: TargetId, descriptor: TargetDescriptor) -> Option<CursorAppearance> {
        self.targets.insert(target, descriptor);
        (self.hovered == Some(target)).then(|| self.appearance())
    }

    pub fn unregister(&mut self, target: TargetId) -> Option<CursorAppearance> {
        self.targets.remove(&target)?;
        if self.hovered != Some(target) {
            return None;
        }

        self.hovered = None;
        Some(CursorAppearance::idle())
    }

    pub fn pointer_enter(&mut self, target: TargetId) -> Option<CursorAppearance> {
        if !self.targets.contains_key(&target) {
            return None;
        }

        self.hovered = Some(target);
        Some(self.appearance())
    }

    pub fn pointer_leave(&mut self, target: TargetId) -> Option<CursorAppearance> {
        if self.hovered != Some(target) {
            return None;
        }

        self.hovered = None;
        Some(CursorAppearance::idle())
    }
}

type Listener = Rc<dyn Fn(&CursorAppearance)>;
type ListenerList = RefCell<Vec<(u64, Listener)>>;

thread_local! {
    static GLOBAL_REGISTRY: SharedRegistry = SharedRegistry::default();
}

/// Cloneable handle to a [`TargetRegistry`] that notifies subscribers of
/// appearance changes.
#[derive(Clone, Default)]
pub struct SharedRegistry {
    registry: Rc<RefCell<TargetRegistry>>,
    listeners: Rc<ListenerList>,
    next_listener_id: Rc<Cell<u64>>,
}

impl SharedRegistry {
    /// The registry shared by every target and tracker on the page.
    pub fn global() -> Self {
        GLOBAL_REGISTRY.with(Clone::clone)
    }

    pub fn appearance(&self) -> CursorAppearance {
        self.registry.borrow().appearance()
    }

    pub fn len(&self) -> usize {
        self.registry.borrow().len()
    }

    pub fn register(&self, target: TargetId, descriptor: TargetDescriptor) {
        log_event(
            LogLevel::Debug,
            "cursor_target_registered",
            json!({ "target": target, "descriptor": &descriptor }),
        );
        let change = self.registry.borrow_mut().register(target, descriptor);
        self.publish(change);
    }

    pub fn unregister(&self, target: TargetId) {
        log_event(
            LogLevel::Debug,
            "cursor_target_unregistered",
            json!({ "target": target }),
        );
        let change = self.registry.borrow_mut().unregister(target);
        self.publish(change);
    }

    pub fn pointer_enter(&self, target: TargetId) {
        let change = self.registry.borrow_mut().pointer_enter(target);
        if let Some(appearance) = change.as_ref() {
            log_event(
                LogLevel::Debug,
                "cursor_target_entered",
                json!({ "target": target, "appearance": appearance }),
            );
        }
        self.publish(change);
    }

    pub fn pointer_leave(&self, target: TargetId) {
        let change = self.registry.borrow_mut().pointer_leave(target);
        self.publish(change);
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&CursorAppearance) + 'static,
    {
        let id = self.next_listener_id.get();
        self.next_listener_id.set(id + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));

        Subscription {
            id,
            listeners: Rc::downgrade(&self.listeners),
        }
    }

    fn publish(&self, change: Option<CursorAppearance>) {
        let Some(appearance) = change else {
            return;
        };

        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in listeners {
            listener(&appearance);
        }
    }
}

/// Removes its listener from the registry when dropped.
pub struct Subscription {
    id: u64,
    listeners: Weak<ListenerList>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}
