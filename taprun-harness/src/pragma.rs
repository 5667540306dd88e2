// This file is part of taprun, a TAP-driven test harness.
// Copyright (C) 2026 the taprun developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Registry of harness pragmas
//!
//! A pragma is a named toggle a test flips in-band (TAP 13 and later).
//! The interpreter looks pragmas up here by name, so new pragmas can be
//! added without touching the interpreter. Each pragma remembers the
//! [`Context`] value it first overwrote and restores it on
//! [`Toggle::Reset`]; the batch driver resets every pragma before each
//! testset so that toggles cannot leak from one test program into the
//! next.

use crate::context::Context;

/// Operation applied to a pragma
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Toggle {
    /// Turn the pragma on (`+name`).
    On,
    /// Turn the pragma off (`-name`).
    Off,
    /// Restore the value from before the first toggle.
    Reset,
}

/// A named harness toggle
pub trait Pragma {
    /// Returns the name tests use to address this pragma.
    fn name(&self) -> &str;

    /// Applies a toggle operation to the context.
    fn toggle(&mut self, context: &mut Context, op: Toggle);

    /// Offers a whole pragma line to this entry.
    ///
    /// An entry may claim a line to implement richer directives than a
    /// plain toggle. Returns `true` if the line was handled; no further
    /// entries see it then.
    fn check(&mut self, _context: &mut Context, _line: &str) -> bool {
        false
    }
}

/// Toggle for a boolean [`Context`] field
///
/// Covers the built-in pragmas; the `field` accessor picks the flag the
/// pragma controls.
struct FlagPragma {
    name: &'static str,
    field: fn(&mut Context) -> &mut bool,
    saved: Option<bool>,
}

impl Pragma for FlagPragma {
    fn name(&self) -> &str {
        self.name
    }

    fn toggle(&mut self, context: &mut Context, op: Toggle) {
        match op {
            Toggle::On | Toggle::Off => {
                let field = (self.field)(context);
                self.saved.get_or_insert(*field);
                *field = op == Toggle::On;
            }
            Toggle::Reset => {
                if let Some(value) = self.saved.take() {
                    *(self.field)(context) = value;
                }
            }
        }
    }
}

/// Ordered table of registered pragmas
#[derive(Default)]
pub struct Registry {
    entries: Vec<Box<dyn Pragma>>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|entry| entry.name()))
            .finish()
    }
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in `strict` and `readblock`
    /// pragmas.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(FlagPragma {
            name: "strict",
            field: |context| &mut context.strict,
            saved: None,
        }));
        registry.register(Box::new(FlagPragma {
            name: "readblock",
            field: |context| &mut context.readblock,
            saved: None,
        }));
        registry
    }

    /// Appends a pragma to the registry.
    pub fn register(&mut self, pragma: Box<dyn Pragma>) {
        self.entries.push(pragma);
    }

    /// Applies `op` to the pragma called `name`.
    ///
    /// Unknown names are ignored and reported as `false`; a test may
    /// address pragmas meaningful only to another harness.
    pub fn apply(&mut self, context: &mut Context, name: &str, op: Toggle) -> bool {
        match self.entries.iter_mut().find(|entry| entry.name() == name) {
            Some(entry) => {
                entry.toggle(context, op);
                true
            }
            None => false,
        }
    }

    /// Resets every pragma to its pre-toggle value.
    pub fn reset_all(&mut self, context: &mut Context) {
        for entry in &mut self.entries {
            entry.toggle(context, Toggle::Reset);
        }
    }

    /// Offers a pragma line to each entry in registration order.
    ///
    /// Returns `true` as soon as one entry claims the line.
    pub fn offer(&mut self, context: &mut Context, line: &str) -> bool {
        self.entries
            .iter_mut()
            .any(|entry| entry.check(context, line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_on_and_off() {
        let mut context = Context::default();
        let mut registry = Registry::builtin();
        assert!(registry.apply(&mut context, "strict", Toggle::On));
        assert!(context.strict);
        assert!(registry.apply(&mut context, "strict", Toggle::Off));
        assert!(!context.strict);
    }

    #[test]
    fn unknown_name_is_ignored() {
        let mut context = Context::default();
        let mut registry = Registry::builtin();
        assert!(!registry.apply(&mut context, "no_such", Toggle::On));
        assert_eq!(context, Context::default());
    }

    #[test]
    fn reset_restores_the_original_value() {
        let mut context = Context {
            strict: true,
            ..Context::default()
        };
        let mut registry = Registry::builtin();
        registry.apply(&mut context, "strict", Toggle::Off);
        registry.apply(&mut context, "strict", Toggle::On);
        registry.apply(&mut context, "strict", Toggle::Off);
        assert!(!context.strict);
        registry.reset_all(&mut context);
        assert!(context.strict);
    }

    #[test]
    fn reset_without_toggle_is_a_no_op() {
        let mut context = Context {
            readblock: true,
            ..Context::default()
        };
        let mut registry = Registry::builtin();
        registry.reset_all(&mut context);
        assert!(context.readblock);
    }

    #[test]
    fn reset_forgets_the_saved_value() {
        let mut context = Context::default();
        let mut registry = Registry::builtin();
        registry.apply(&mut context, "readblock", Toggle::On);
        registry.reset_all(&mut context);
        assert!(!context.readblock);

        // A toggle after the reset saves the then-current value.
        context.readblock = true;
        registry.apply(&mut context, "readblock", Toggle::Off);
        registry.reset_all(&mut context);
        assert!(context.readblock);
    }

    #[test]
    fn check_hooks_run_in_registration_order() {
        struct Claiming {
            name: &'static str,
            claimed: std::rc::Rc<std::cell::Cell<u32>>,
        }
        impl Pragma for Claiming {
            fn name(&self) -> &str {
                self.name
            }
            fn toggle(&mut self, _: &mut Context, _: Toggle) {}
            fn check(&mut self, _: &mut Context, line: &str) -> bool {
                if line.contains(self.name) {
                    self.claimed.set(self.claimed.get() + 1);
                    true
                } else {
                    false
                }
            }
        }

        let claimed = std::rc::Rc::new(std::cell::Cell::new(0));
        let mut registry = Registry::builtin();
        registry.register(Box::new(Claiming {
            name: "first",
            claimed: claimed.clone(),
        }));
        registry.register(Box::new(Claiming {
            name: "first", // same trigger; must not run after a claim
            claimed: claimed.clone(),
        }));

        let mut context = Context::default();
        assert!(registry.offer(&mut context, "pragma +first"));
        assert_eq!(claimed.get(), 1);
        assert!(!registry.offer(&mut context, "pragma +strict"));
    }
}
