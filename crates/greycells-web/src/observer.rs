#![forbid(unsafe_code)]

//! `IntersectionObserver` that reports each element once.

use std::cell::RefCell;
use std::rc::Rc;

use greycells_core::error::SiteResult;
use greycells_core::observe::{ObserverOptions, OnceObserver};
use js_sys::Array;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::dom::dom_err;

type EntriesCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// Watches a fixed list of elements; each one fires at most once, then is
/// unobserved. Disconnects on drop.
pub(crate) struct OnceVisibility {
    observer: IntersectionObserver,
    tracker: Rc<RefCell<OnceObserver<usize>>>,
    _callback: EntriesCallback,
}

impl OnceVisibility {
    /// `on_visible(index, element)` runs on the first intersecting report for
    /// `elements[index]`.
    pub fn observe<F>(
        elements: Vec<Element>,
        options: &ObserverOptions,
        mut on_visible: F,
    ) -> SiteResult<Self>
    where
        F: FnMut(usize, &Element) + 'static,
    {
        let tracker = Rc::new(RefCell::new(OnceObserver::new()));
        let watched = elements.clone();
        let callback_tracker = Rc::clone(&tracker);
        let callback: EntriesCallback =
            Closure::new(move |entries: Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    let target = entry.target();
                    let Some(index) = watched.iter().position(|el| *el == target) else {
                        continue;
                    };
                    if callback_tracker
                        .borrow_mut()
                        .notify(&index, entry.is_intersecting())
                    {
                        observer.unobserve(&target);
                        on_visible(index, &target);
                    }
                }
            });

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin.to_css());
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .map_err(|err| dom_err("IntersectionObserver", &err))?;

        {
            let mut tracker = tracker.borrow_mut();
            for (index, el) in elements.iter().enumerate() {
                tracker.observe(index);
                observer.observe(el);
            }
        }

        Ok(Self {
            observer,
            tracker,
            _callback: callback,
        })
    }

    pub fn pending(&self) -> usize {
        self.tracker.borrow().pending()
    }
}

impl Drop for OnceVisibility {
    fn drop(&mut self) {
        self.observer.disconnect();
        self.tracker.borrow_mut().disconnect();
    }
}
