//! Canvas mouse/touch listeners feeding [`InlineViewInput`].

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{EventTarget, MouseEvent, TouchEvent};

use odooxr_core::{InlineViewInput, TouchPoint};

type TouchHandler = fn(&mut InlineViewInput, &[TouchPoint]);

const TOUCH_HANDLERS: [(&str, TouchHandler); 4] = [
    ("touchstart", InlineViewInput::on_touch_start),
    ("touchmove", InlineViewInput::on_touch_move),
    ("touchend", InlineViewInput::on_touch_end),
    ("touchcancel", InlineViewInput::on_touch_cancel),
];

fn changed_touches(event: &TouchEvent) -> Vec<TouchPoint> {
    let list = event.changed_touches();
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|t| TouchPoint::new(t.identifier(), f64::from(t.page_x()), f64::from(t.page_y())))
        .collect()
}

/// Live listeners on the canvas. Removed again on drop.
pub struct InputListeners {
    target: EventTarget,
    mouse: Closure<dyn FnMut(MouseEvent)>,
    touch: Vec<(&'static str, Closure<dyn FnMut(TouchEvent)>)>,
}

impl InputListeners {
    pub fn attach(target: &EventTarget, input: Rc<RefCell<InlineViewInput>>) -> Result<Self, JsValue> {
        let mouse = {
            let input = Rc::clone(&input);
            Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
                input.borrow_mut().on_mouse_move(
                    event.buttons(),
                    f64::from(event.movement_x()),
                    f64::from(event.movement_y()),
                );
            })
        };
        target.add_event_listener_with_callback("mousemove", mouse.as_ref().unchecked_ref())?;

        let mut touch = Vec::with_capacity(TOUCH_HANDLERS.len());
        for (name, handler) in TOUCH_HANDLERS {
            let input = Rc::clone(&input);
            let listener = Closure::<dyn FnMut(TouchEvent)>::new(move |event: TouchEvent| {
                handler(&mut input.borrow_mut(), &changed_touches(&event));
            });
            target.add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())?;
            touch.push((name, listener));
        }

        Ok(Self {
            target: target.clone(),
            mouse,
            touch,
        })
    }
}

impl Drop for InputListeners {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback("mousemove", self.mouse.as_ref().unchecked_ref());
        for (name, listener) in &self.touch {
            let _ = self
                .target
                .remove_event_listener_with_callback(name, listener.as_ref().unchecked_ref());
        }
    }
}
