//! FFI bindings for health-trends
//!
//! This module provides C-compatible functions for calling the engine from dashboard
//! front ends. All functions use C strings (null-terminated) and return allocated memory
//! that must be freed by the caller using `health_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_double, c_int};
use std::ptr;

use crate::curve::{build_area_path, build_smooth_path, CurveOptions};
use crate::pipeline::series_to_summary_json;
use crate::score::vitality_score;

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

// ============================================================================
// Series
// ============================================================================

/// Summarize a metric series JSON object and return the summary JSON.
///
/// # Safety
/// - `series_json` must be a valid null-terminated C string.
/// - `config_json` may be NULL to use the default engine configuration.
/// - Returns a newly allocated string that must be freed with `health_free_string`.
/// - Returns NULL on error; call `health_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn health_summarize_series(
    series_json: *const c_char,
    config_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let series_str = match cstr_to_string(series_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid series JSON string pointer");
            return ptr::null_mut();
        }
    };

    let config_str = if config_json.is_null() {
        None
    } else {
        match cstr_to_string(config_json) {
            Some(s) => Some(s),
            None => {
                set_last_error("Invalid config JSON string pointer");
                return ptr::null_mut();
            }
        }
    };

    match series_to_summary_json(series_str, config_str) {
        Ok(summary) => string_to_cstr(&summary),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Build a smooth (or area) path for `len` values and return it as a path string.
///
/// # Safety
/// - `values` must point to `len` readable doubles (may be NULL when `len` is 0).
/// - Returns a newly allocated string that must be freed with `health_free_string`.
/// - Returns NULL on error; call `health_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn health_smooth_path(
    values: *const c_double,
    len: usize,
    width: c_double,
    height: c_double,
    area: c_int,
) -> *mut c_char {
    clear_last_error();

    if values.is_null() && len > 0 {
        set_last_error("Invalid values pointer");
        return ptr::null_mut();
    }
    let slice: &[f64] = if len == 0 {
        &[]
    } else {
        std::slice::from_raw_parts(values, len)
    };

    let options = CurveOptions::new(width, height);
    if let Err(e) = options.validate() {
        set_last_error(&e.to_string());
        return ptr::null_mut();
    }

    let path = if area != 0 {
        build_area_path(slice, &options)
    } else {
        build_smooth_path(slice, &options)
    };
    match path {
        Ok(path) => string_to_cstr(&path.to_string()),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Compute the 0-100 vitality score. Never fails.
#[no_mangle]
pub extern "C" fn health_vitality_score(
    mood: c_double,
    energy: c_double,
    sleep_quality: c_double,
    stress: c_double,
) -> c_int {
    vitality_score(mood, energy, sleep_quality, stress) as c_int
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by this library.
///
/// # Safety
/// - `ptr` must have been returned by a health-trends function, or be NULL.
#[no_mangle]
pub unsafe extern "C" fn health_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer owned by the library, valid until the next call on this thread.
///   Do NOT free.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn health_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

/// Get the library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn health_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
