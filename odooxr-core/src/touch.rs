/// One entry of a touch event's `changedTouches` list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub identifier: i32,
    pub page_x: f64,
    pub page_y: f64,
}

impl TouchPoint {
    pub fn new(identifier: i32, page_x: f64, page_y: f64) -> Self {
        Self {
            identifier,
            page_x,
            page_y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PrimaryTouch {
    identifier: i32,
    last_x: f64,
    last_y: f64,
}

impl PrimaryTouch {
    fn delta_to(&self, touch: &TouchPoint) -> (f64, f64) {
        (touch.page_x - self.last_x, touch.page_y - self.last_y)
    }
}

/// Follows the single touch that drives inline look-around.
///
/// The first touch to start while none is tracked becomes primary; every
/// other touch is ignored until the primary one ends or is cancelled.
#[derive(Debug, Clone, Default)]
pub struct TouchTracker {
    primary: Option<PrimaryTouch>,
}

impl TouchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primary_identifier(&self) -> Option<i32> {
        self.primary.map(|p| p.identifier)
    }

    /// Returns `true` when the first changed touch became primary.
    pub fn start(&mut self, changed: &[TouchPoint]) -> bool {
        if self.primary.is_some() {
            return false;
        }
        let Some(touch) = changed.first() else {
            return false;
        };
        self.primary = Some(PrimaryTouch {
            identifier: touch.identifier,
            last_x: touch.page_x,
            last_y: touch.page_y,
        });
        true
    }

    /// Delta since the last known position of the primary touch, if it moved.
    pub fn moved(&mut self, changed: &[TouchPoint]) -> Option<(f64, f64)> {
        let primary = self.primary.as_mut()?;
        let identifier = primary.identifier;
        let touch = changed.iter().find(|t| t.identifier == identifier)?;
        let delta = primary.delta_to(touch);
        primary.last_x = touch.page_x;
        primary.last_y = touch.page_y;
        Some(delta)
    }

    /// Final delta of the primary touch if it just lifted; tracking is cleared.
    pub fn end(&mut self, changed: &[TouchPoint]) -> Option<(f64, f64)> {
        let primary = self.primary?;
        let touch = changed.iter().find(|t| t.identifier == primary.identifier)?;
        self.primary = None;
        Some(primary.delta_to(touch))
    }

    /// Drops tracking without a delta. Returns `true` if the primary was cancelled.
    pub fn cancel(&mut self, changed: &[TouchPoint]) -> bool {
        match self.primary {
            Some(primary) if changed.iter().any(|t| t.identifier == primary.identifier) => {
                self.primary = None;
                true
            }
            _ => false,
        }
    }
}
