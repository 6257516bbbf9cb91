//! Routine dispatch.
//!
//! A routine is a block of logic other modules may intercept. Each routine
//! key owns an ordered chain of interceptors; signalling the key runs the
//! chain in registration order and ends at the base implementation.
//!
//! ```ignore
//! static DOUBLE: Routine<Counter, i32, i32> = Routine::new("double", "double", Counter::double);
//!
//! kernel.routines().intercept(&DOUBLE, |n, next| next.call(n + 1))?;
//! assert_eq!(DOUBLE.invoke(&counter, &kernel, 2), 6);
//! ```

use std::any::{Any, TypeId, type_name};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{KernelError, Result};
use crate::kernel::Kernel;

/// Argument/result types of a routine, used to type-check interceptors.
#[derive(Clone, Copy, Debug)]
pub struct Signature {
    id: TypeId,
    name: &'static str,
}

impl Signature {
    pub fn of<A: 'static, R: 'static>() -> Signature {
        Signature {
            id: TypeId::of::<fn(A) -> R>(),
            name: type_name::<fn(A) -> R>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Signature {}

/// Type-erased routine declaration stored in an extension's metadata table.
#[derive(Clone, Copy, Debug)]
pub struct RoutineDescriptor {
    pub name: &'static str,
    pub key: &'static str,
    pub signature: fn() -> Signature,
}

/// A routine with a typed base implementation on `T`.
///
/// Callers go through [`Routine::invoke`], which signals the routine key so
/// that registered interceptors run before (or instead of) the base.
pub struct Routine<T: 'static, A: 'static, R: 'static> {
    pub name: &'static str,
    pub key: &'static str,
    pub implementation: fn(&T, A) -> R,
}

impl<T: 'static, A: 'static, R: 'static> Routine<T, A, R> {
    pub const fn new(name: &'static str, key: &'static str, implementation: fn(&T, A) -> R) -> Self {
        Routine {
            name,
            key,
            implementation,
        }
    }

    pub fn descriptor(&self) -> RoutineDescriptor {
        RoutineDescriptor {
            name: self.name,
            key: self.key,
            signature: Signature::of::<A, R>,
        }
    }

    /// Run the routine on `target` through the kernel's interceptor chain.
    pub fn invoke(&self, target: &T, kernel: &Kernel, args: A) -> R {
        let implementation = self.implementation;
        kernel
            .routines()
            .signal(self.key, args, |args| implementation(target, args))
    }
}

/// An interceptor: receives the arguments and the rest of the chain.
pub type Interceptor<A, R> = Rc<dyn Fn(A, Next<'_, A, R>) -> R>;

/// Handle returned by [`RoutineDispatcher::intercept`], used to remove it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InterceptorId(u64);

struct Link<A: 'static, R: 'static> {
    id: InterceptorId,
    run: Interceptor<A, R>,
}

impl<A: 'static, R: 'static> Clone for Link<A, R> {
    fn clone(&self) -> Self {
        Link {
            id: self.id,
            run: Rc::clone(&self.run),
        }
    }
}

/// Continuation to the next link of a chain, ending at the base.
///
/// Consumed by [`Next::call`]; an interceptor that drops it without calling
/// short-circuits everything after it, including the base.
pub struct Next<'a, A: 'static, R: 'static> {
    chain: &'a [Link<A, R>],
    base: &'a mut dyn FnMut(A) -> R,
}

impl<A: 'static, R: 'static> Next<'_, A, R> {
    pub fn call(self, args: A) -> R {
        match self.chain.split_first() {
            Some((head, rest)) => (head.run.as_ref())(
                args,
                Next {
                    chain: rest,
                    base: self.base,
                },
            ),
            None => (self.base)(args),
        }
    }
}

struct Slot {
    signature: Signature,
    len: usize,
    /// `Rc<Vec<Link<A, R>>>`, rebuilt on every registration change.
    chain: Option<Rc<dyn Any>>,
}

/// Kernel-owned table of routine keys and their interceptor chains.
#[derive(Default)]
pub struct RoutineDispatcher {
    slots: RefCell<HashMap<String, Slot>>,
    next_id: Cell<u64>,
}

impl RoutineDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a routine key with its signature.
    ///
    /// Declaring the same key twice with the same signature is allowed.
    pub fn declare(&self, descriptor: &RoutineDescriptor) -> Result<()> {
        let signature = (descriptor.signature)();
        let mut slots = self.slots.borrow_mut();
        match slots.get(descriptor.key) {
            Some(slot) if slot.signature != signature => Err(KernelError::RoutineSignature {
                key: descriptor.key.to_string(),
                expected: slot.signature.name(),
                found: signature.name(),
            }),
            Some(_) => Ok(()),
            None => {
                slots.insert(
                    descriptor.key.to_string(),
                    Slot {
                        signature,
                        len: 0,
                        chain: None,
                    },
                );
                Ok(())
            }
        }
    }

    /// Append an interceptor to the routine's chain.
    pub fn intercept<T, A, R, F>(&self, routine: &Routine<T, A, R>, f: F) -> Result<InterceptorId>
    where
        T: 'static,
        A: 'static,
        R: 'static,
        F: Fn(A, Next<'_, A, R>) -> R + 'static,
    {
        let signature = Signature::of::<A, R>();
        let id = InterceptorId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let mut slots = self.slots.borrow_mut();
        let slot = slots.entry(routine.key.to_string()).or_insert(Slot {
            signature,
            len: 0,
            chain: None,
        });
        if slot.signature != signature {
            return Err(KernelError::RoutineSignature {
                key: routine.key.to_string(),
                expected: slot.signature.name(),
                found: signature.name(),
            });
        }

        let mut links: Vec<Link<A, R>> = slot
            .chain
            .as_ref()
            .and_then(|chain| chain.downcast_ref::<Vec<Link<A, R>>>())
            .cloned()
            .unwrap_or_default();
        links.push(Link {
            id,
            run: Rc::new(f),
        });
        slot.len = links.len();
        slot.chain = Some(Rc::new(links));
        tracing::debug!(routine = routine.key, chain = slot.len, "interceptor registered");
        Ok(id)
    }

    /// Remove a previously registered interceptor. Returns whether it existed.
    pub fn release<T, A, R>(&self, routine: &Routine<T, A, R>, id: InterceptorId) -> bool
    where
        T: 'static,
        A: 'static,
        R: 'static,
    {
        let mut slots = self.slots.borrow_mut();
        let Some(slot) = slots.get_mut(routine.key) else {
            return false;
        };
        let Some(links) = slot
            .chain
            .as_ref()
            .and_then(|chain| chain.downcast_ref::<Vec<Link<A, R>>>())
        else {
            return false;
        };
        let remaining: Vec<Link<A, R>> = links.iter().filter(|l| l.id != id).cloned().collect();
        if remaining.len() == links.len() {
            return false;
        }
        slot.len = remaining.len();
        slot.chain = if remaining.is_empty() {
            None
        } else {
            Some(Rc::new(remaining))
        };
        true
    }

    /// Number of interceptors currently registered for `key`.
    pub fn chain_len(&self, key: &str) -> usize {
        self.slots.borrow().get(key).map_or(0, |slot| slot.len)
    }

    /// Run `base` for `key`, threading the call through any interceptors.
    ///
    /// The chain is snapshotted before it runs, so interceptors may signal
    /// routines (including this one) or register new interceptors.
    pub fn signal<A, R, F>(&self, key: &str, args: A, base: F) -> R
    where
        A: 'static,
        R: 'static,
        F: FnMut(A) -> R,
    {
        let chain = self
            .slots
            .borrow()
            .get(key)
            .and_then(|slot| slot.chain.clone());
        let mut base = base;
        let Some(chain) = chain else {
            return base(args);
        };
        match chain.downcast::<Vec<Link<A, R>>>() {
            Ok(links) => Next {
                chain: &links,
                base: &mut base,
            }
            .call(args),
            Err(_) => {
                tracing::error!(routine = key, "routine signalled with a foreign signature");
                base(args)
            }
        }
    }
}
