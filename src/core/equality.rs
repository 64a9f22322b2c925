// ============================================================================
// ripple-collections - Equality Relations
// Injected per-collection equality, never global
// ============================================================================

// =============================================================================
// EQUALITY FUNCTION TYPE
// =============================================================================

/// Equality function type for comparing collection values.
///
/// Collections store one of these per instance and use it to suppress no-op
/// replacements. Constructors accept a custom function; the default is
/// [`default_equals`].
pub type EqualsFn<T> = fn(&T, &T) -> bool;

/// Default equality using PartialEq.
pub fn default_equals<T: PartialEq>(a: &T, b: &T) -> bool {
    a == b
}

// =============================================================================
// STRICT EQUALITY
// =============================================================================

/// Strict equality using PartialEq.
///
/// # Example
/// ```
/// use ripple_collections::core::equality::equals;
///
/// assert!(equals(&42, &42));
/// assert!(!equals(&42, &43));
/// ```
pub fn equals<T: PartialEq>(a: &T, b: &T) -> bool {
    a == b
}

// =============================================================================
// SAFE FLOAT EQUALITY (Handles NaN)
// =============================================================================

/// Safe equality for f64 values: NaN is considered equal to NaN.
///
/// Useful as an injected relation for float-valued collections, where IEEE
/// 754 `NaN != NaN` would make every write of a NaN look like a change.
///
/// # Example
/// ```
/// use ripple_collections::core::equality::safe_equals_f64;
///
/// assert!(safe_equals_f64(&1.0, &1.0));
/// assert!(!safe_equals_f64(&1.0, &2.0));
/// assert!(safe_equals_f64(&f64::NAN, &f64::NAN));
/// ```
pub fn safe_equals_f64(a: &f64, b: &f64) -> bool {
    if a.is_nan() {
        return b.is_nan();
    }
    a == b
}

/// Safe equality for f32 values: NaN is considered equal to NaN.
pub fn safe_equals_f32(a: &f32, b: &f32) -> bool {
    if a.is_nan() {
        return b.is_nan();
    }
    a == b
}

// =============================================================================
// FACTORY FUNCTIONS
// =============================================================================

/// Never equal - every write is treated as a change.
pub fn never_equals<T>(_a: &T, _b: &T) -> bool {
    false
}

/// Always equal - every replacement is suppressed as a no-op.
pub fn always_equals<T>(_a: &T, _b: &T) -> bool {
    true
}

/// Build an equality closure that compares by a projected field.
///
/// Closures cannot be stored as [`EqualsFn`] (which is a fn pointer); this
/// is for call sites that take `impl Fn(&T, &T) -> bool`.
///
/// # Example
/// ```
/// use ripple_collections::core::equality::by_field;
///
/// struct User { id: u32, name: String }
///
/// let eq = by_field(|u: &User| u.id);
/// let a = User { id: 1, name: "ada".into() };
/// let b = User { id: 1, name: "bab".into() };
/// assert!(eq(&a, &b));
/// ```
pub fn by_field<T, F, R>(field_fn: F) -> impl Fn(&T, &T) -> bool
where
    F: Fn(&T) -> R,
    R: PartialEq,
{
    move |a, b| field_fn(a) == field_fn(b)
}

// =============================================================================
// TESTS
// =============================================================================
