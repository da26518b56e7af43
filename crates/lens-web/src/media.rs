/// Users who asked the OS to minimize motion.
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
/// Devices with a hovering, precise pointer (mouse, trackpad, pen).
pub const FINE_POINTER_QUERY: &str = "(hover: hover) and (pointer: fine)";

/// Evaluate a media query, falling back to `default` where `matchMedia` is unavailable.
pub fn matches(window: &web_sys::Window, query: &str, default: bool) -> bool {
    match window.match_media(query) {
        Ok(Some(list)) => list.matches(),
        Ok(None) | Err(_) => {
            log::debug!("matchMedia unavailable for {}", query);
            default
        }
    }
}

pub fn prefers_reduced_motion(window: &web_sys::Window) -> bool {
    matches(window, REDUCED_MOTION_QUERY, false)
}

pub fn has_fine_pointer(window: &web_sys::Window) -> bool {
    matches(window, FINE_POINTER_QUERY, true)
}
