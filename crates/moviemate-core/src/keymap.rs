//! Key bindings scoped to the lifetime of a view.
//!
//! A [`Keymap`] is the host's key-press stream. Binding a key returns a
//! [`KeyBinding`] handle; the binding stays live until the handle is dropped.

use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Escape,
    Char(char),
}

impl Key {
    /// Parse a key name as the host reports it ("Enter", "Escape", "Esc", or a single character)
    pub fn from_name(name: &str) -> Option<Key> {
        match name {
            "Enter" | "Return" => Some(Key::Enter),
            "Escape" | "Esc" => Some(Key::Escape),
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Key::Char(c)),
                    _ => None,
                }
            }
        }
    }
}

/// Answers whether a text input currently owns keyboard focus.
pub trait FocusProbe {
    fn text_input_focused(&self) -> bool;
}

impl FocusProbe for bool {
    fn text_input_focused(&self) -> bool {
        *self
    }
}

type Guard = Box<dyn Fn(&dyn FocusProbe) -> bool + Send>;
type Handler = Box<dyn FnMut() + Send>;

struct Registration {
    id: u64,
    key: Key,
    guard: Option<Guard>,
    handler: Handler,
}

#[derive(Default)]
struct Bindings {
    next_id: u64,
    registrations: Vec<Registration>,
}

#[derive(Clone, Default)]
pub struct Keymap {
    bindings: Arc<Mutex<Bindings>>,
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind<F>(&self, key: Key, handler: F) -> KeyBinding
    where
        F: FnMut() + Send + 'static,
    {
        self.register(key, None, Box::new(handler))
    }

    /// Bind a handler that only fires while `guard` accepts the current focus
    pub fn bind_guarded<G, F>(&self, key: Key, guard: G, handler: F) -> KeyBinding
    where
        G: Fn(&dyn FocusProbe) -> bool + Send + 'static,
        F: FnMut() + Send + 'static,
    {
        self.register(key, Some(Box::new(guard)), Box::new(handler))
    }

    /// Deliver one key press. Returns how many handlers fired.
    ///
    /// Handlers run while the keymap is locked and must not bind or drop bindings themselves.
    pub fn dispatch(&self, key: &Key, focus: &dyn FocusProbe) -> usize {
        let mut bindings = lock(&self.bindings);
        let mut fired = 0;
        for registration in bindings.registrations.iter_mut() {
            if &registration.key != key {
                continue;
            }
            if let Some(guard) = &registration.guard {
                if !guard(focus) {
                    trace!("Guard rejected {:?} for binding {}", key, registration.id);
                    continue;
                }
            }
            (registration.handler)();
            fired += 1;
        }
        fired
    }

    /// Number of live bindings for `key`
    pub fn bound_count(&self, key: &Key) -> usize {
        lock(&self.bindings)
            .registrations
            .iter()
            .filter(|r| &r.key == key)
            .count()
    }

    fn register(&self, key: Key, guard: Option<Guard>, handler: Handler) -> KeyBinding {
        let mut bindings = lock(&self.bindings);
        let id = bindings.next_id;
        bindings.next_id += 1;
        bindings.registrations.push(Registration {
            id,
            key: key.clone(),
            guard,
            handler,
        });
        debug!("Bound {:?} (binding {})", key, id);

        KeyBinding {
            id,
            key,
            bindings: Arc::downgrade(&self.bindings),
        }
    }
}

fn lock(bindings: &Mutex<Bindings>) -> MutexGuard<'_, Bindings> {
    bindings.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Live registration; unbinds itself when dropped.
pub struct KeyBinding {
    id: u64,
    key: Key,
    bindings: Weak<Mutex<Bindings>>,
}

impl KeyBinding {
    pub fn key(&self) -> &Key {
        &self.key
    }
}

impl Drop for KeyBinding {
    fn drop(&mut self) {
        // The keymap may already be gone
        if let Some(bindings) = self.bindings.upgrade() {
            lock(&bindings).registrations.retain(|r| r.id != self.id);
            debug!("Unbound {:?} (binding {})", self.key, self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, impl FnMut() + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let handle = count.clone();
        (count, move || {
            handle.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_key_from_name() {
        assert_eq!(Key::from_name("Enter"), Some(Key::Enter));
        assert_eq!(Key::from_name("Esc"), Some(Key::Escape));
        assert_eq!(Key::from_name("q"), Some(Key::Char('q')));
        assert_eq!(Key::from_name("F12"), None);
        assert_eq!(Key::from_name(""), None);
    }

    #[test]
    fn test_handler_fires_on_every_matching_press() {
        let keymap = Keymap::new();
        let (count, handler) = counter();
        let _binding = keymap.bind(Key::Escape, handler);

        assert_eq!(keymap.dispatch(&Key::Escape, &false), 1);
        assert_eq!(keymap.dispatch(&Key::Enter, &false), 0);
        assert_eq!(keymap.dispatch(&Key::Escape, &false), 1);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_drop_unbinds() {
        let keymap = Keymap::new();
        let (count, handler) = counter();
        let binding = keymap.bind(Key::Escape, handler);
        assert_eq!(keymap.bound_count(&Key::Escape), 1);

        drop(binding);

        assert_eq!(keymap.bound_count(&Key::Escape), 0);
        assert_eq!(keymap.dispatch(&Key::Escape, &false), 0);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_guard_blocks_when_text_input_focused() {
        let keymap = Keymap::new();
        let (count, handler) = counter();
        let _binding =
            keymap.bind_guarded(Key::Enter, |focus| !focus.text_input_focused(), handler);

        assert_eq!(keymap.dispatch(&Key::Enter, &true), 0);
        assert_eq!(keymap.dispatch(&Key::Enter, &false), 1);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_binding_outliving_keymap_drops_cleanly() {
        let keymap = Keymap::new();
        let (_count, handler) = counter();
        let binding = keymap.bind(Key::Char('x'), handler);
        drop(keymap);
        drop(binding);
    }
}
