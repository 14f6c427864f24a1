/// DOM wiring constants for the browser front-end.
///
/// Attribute names, canvas styling and the debounce/observer knobs that sit
/// outside the platform-free core.
// Auto-mount attributes
pub const SURFACE_ATTR: &str = "data-surface";
pub const SURFACE_CONFIG_ATTR: &str = "data-surface-config";
pub const SURFACE_SELECTOR: &str = "[data-surface]";

// Canvas element
pub const CANVAS_CLASS: &str = "animated-surface";
pub const CANVAS_STYLE: [(&str, &str); 6] = [
    ("position", "absolute"),
    ("inset", "0"),
    ("width", "100%"),
    ("height", "100%"),
    ("display", "block"),
    ("pointer-events", "none"),
];

// Window events the host listens to
pub const RESIZE_EVENT: &str = "resize";
pub const POINTER_EVENT: &str = "pointermove";

// Fallback drawing size before the container has been measured (pixels)
pub const INITIAL_CANVAS_PX: u32 = 1;
