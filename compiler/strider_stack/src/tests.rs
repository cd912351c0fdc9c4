use super::*;

#[test]
fn shallow_activation_chain() {
    fn walk(depth: u64) -> u64 {
        ensure_sufficient_stack(|| if depth == 0 { 0 } else { walk(depth - 1) + 1 })
    }

    assert_eq!(walk(16), 16);
}

#[test]
fn deep_activation_chain_grows_stack() {
    // Each level carries a frame-sized buffer, like a nested walker step.
    fn walk(depth: u64) -> u64 {
        ensure_sufficient_stack(|| {
            let slots = [depth; 32];
            if depth == 0 {
                0
            } else {
                walk(depth - 1) + slots[31] - depth + 1
            }
        })
    }

    assert_eq!(walk(100_000), 100_000);
}

#[test]
fn propagates_results() {
    let result: Result<u8, &str> = ensure_sufficient_stack(|| Err("fault"));
    assert_eq!(result, Err("fault"));
}

#[test]
fn reports_remaining_stack_on_native() {
    if cfg!(not(target_arch = "wasm32")) {
        assert!(remaining_stack().is_some_and(|n| n > 0));
    }
}
