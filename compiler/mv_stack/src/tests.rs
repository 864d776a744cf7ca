use super::*;

#[test]
fn deep_recursion_does_not_overflow() {
    fn depth(n: u64) -> u64 {
        ensure_sufficient_stack(|| if n == 0 { 0 } else { depth(n - 1) + 1 })
    }

    assert_eq!(depth(100_000), 100_000);
}

#[test]
fn returns_closure_result() {
    let result: Result<i32, &str> = ensure_sufficient_stack(|| Ok(7));
    assert_eq!(result, Ok(7));
}

#[test]
fn fresh_flag_passes_checkpoint() {
    let flag = CancellationFlag::new();
    assert!(!flag.is_cancelled());
    assert_eq!(flag.check(), Ok(()));
}

#[test]
fn cancel_is_visible_through_clones() {
    let flag = CancellationFlag::new();
    let observer = flag.clone();

    flag.cancel();
    assert!(observer.is_cancelled());
    assert_eq!(observer.check(), Err(Cancelled));

    observer.reset();
    assert_eq!(flag.check(), Ok(()));
}

#[test]
fn cancel_from_another_thread() {
    let flag = CancellationFlag::new();
    let remote = flag.clone();

    std::thread::spawn(move || remote.cancel())
        .join()
        .unwrap_or_else(|_| panic!("cancelling thread panicked"));

    assert!(flag.is_cancelled());
}
