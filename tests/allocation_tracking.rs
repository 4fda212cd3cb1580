//! Net heap usage around failed constructions, measured by a counting
//! global allocator. Counts are per thread so concurrently running tests
//! do not disturb each other.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

use square_matrix::fault::FaultInjector;
use square_matrix::{FaultConfig, Matrix};

struct Counting;

thread_local! {
    static NET_BYTES: Cell<isize> = const { Cell::new(0) };
}

fn record(delta: isize) {
    // the slot may already be gone while a thread is shutting down
    let _ = NET_BYTES.try_with(|net| net.set(net.get() + delta));
}

unsafe impl GlobalAlloc for Counting {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            record(layout.size() as isize);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        record(-(layout.size() as isize));
    }
}

#[global_allocator]
static GLOBAL: Counting = Counting;

fn net_bytes() -> isize {
    NET_BYTES.with(Cell::get)
}

fn failing_construction(injector: &FaultInjector) {
    let mut source = injector.clone();
    let lambda = injector.make(0).unwrap();
    let err = Matrix::with_source(5, &lambda, &mut source).unwrap_err();
    drop(err);
}

#[test]
fn failed_construction_leaves_no_net_allocation() {
    let injector = FaultInjector::new(FaultConfig::fail_on(4));
    // first run settles any lazily initialised runtime state
    failing_construction(&injector);

    let injector = FaultInjector::new(FaultConfig::fail_on(4));
    let before = net_bytes();
    failing_construction(&injector);
    assert_eq!(net_bytes(), before);
    assert_eq!(injector.live(), 0);
}

#[test]
fn failed_copy_leaves_no_net_allocation() {
    failing_construction(&FaultInjector::new(FaultConfig::fail_on(4)));

    let injector = FaultInjector::new(FaultConfig::fail_on(30));
    let mut source = injector.clone();
    let lambda = injector.make(1).unwrap();
    let a = Matrix::with_source(4, &lambda, &mut source).unwrap();
    drop(lambda);

    let before = net_bytes();
    let err = a.try_clone_with(&mut source).unwrap_err();
    drop(err);
    assert_eq!(net_bytes(), before);
    assert_eq!(injector.live(), 16);
}
