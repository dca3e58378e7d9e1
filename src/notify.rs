// Publish/subscribe between the editor and the rest of the application.
//
// Subscribers keep a `Subscription` handle; dropping it removes the callback,
// so no callback outlives the observer that registered it.
use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use crate::color::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteChanged;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorBarEvent {
    Foreground(Color),
    Background(Color),
}

type Callback<E> = Rc<RefCell<dyn FnMut(&E)>>;

struct Slots<E> {
    next_id: u64,
    callbacks: Vec<(u64, Callback<E>)>,
}

pub struct Notifier<E> {
    slots: Rc<RefCell<Slots<E>>>,
}

impl<E> Default for Notifier<E> {
    fn default() -> Self {
        Self {
            slots: Rc::new(RefCell::new(Slots {
                next_id: 0,
                callbacks: vec![],
            })),
        }
    }
}

impl<E: 'static> Notifier<E> {
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl FnMut(&E) + 'static) -> Subscription<E> {
        let mut slots = self.slots.borrow_mut();
        let id = slots.next_id;
        slots.next_id += 1;
        let callback: Callback<E> = Rc::new(RefCell::new(callback));
        slots.callbacks.push((id, callback));
        Subscription {
            id,
            slots: Rc::downgrade(&self.slots),
        }
    }

    // Calls every subscriber in subscription order. A subscriber that is
    // already running further up the stack is skipped.
    pub fn publish(&self, event: &E) {
        let callbacks: Vec<Callback<E>> = self
            .slots
            .borrow()
            .callbacks
            .iter()
            .map(|(_, cb)| cb.clone())
            .collect();
        for cb in callbacks {
            if let Ok(mut cb) = cb.try_borrow_mut() {
                (*cb)(event);
            }
        }
    }
}

pub struct Subscription<E> {
    id: u64,
    slots: Weak<RefCell<Slots<E>>>,
}

impl<E> Drop for Subscription<E> {
    fn drop(&mut self) {
        if let Some(slots) = self.slots.upgrade() {
            slots
                .borrow_mut()
                .callbacks
                .retain(|(id, _)| *id != self.id);
        }
    }
}

impl<E> std::fmt::Debug for Subscription<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
