/// Latest viewport-intersection signal for one container.
///
/// Observer reports arrive asynchronously; only changes are transitions, so a
/// burst of identical reports is absorbed here.
#[derive(Clone, Debug, Default)]
pub struct VisibilityGate {
    visible: bool,
    observing: bool,
    disconnected: bool,
    transitions: u32,
}

impl VisibilityGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the gate as observing. Returns false if already observing or disconnected.
    pub fn observe(&mut self) -> bool {
        if self.observing || self.disconnected {
            return false;
        }
        self.observing = true;
        true
    }

    /// Feed one observer report; returns `Some(new)` only when the value changed.
    pub fn update(&mut self, visible: bool) -> Option<bool> {
        if !self.observing || self.visible == visible {
            return None;
        }
        self.visible = visible;
        self.transitions += 1;
        Some(visible)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_observing(&self) -> bool {
        self.observing
    }

    pub fn transitions(&self) -> u32 {
        self.transitions
    }

    /// Stop observing for good. Returns true exactly once.
    pub fn disconnect(&mut self) -> bool {
        if self.disconnected {
            return false;
        }
        self.disconnected = true;
        self.observing = false;
        self.visible = false;
        true
    }
}
