//  Copyright 2024 strand Project Authors
//
//  Licensed under the Apache License, Version 2.0 (the "License");
//  you may not use this file except in compliance with the License.
//  You may obtain a copy of the License at
//
//  http://www.apache.org/licenses/LICENSE-2.0
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.

//! Failure guarantees of the list under a rationing allocator and panicking elements.

use std::{
    alloc::Layout,
    cell::Cell,
    panic::{catch_unwind, AssertUnwindSafe},
    ptr::NonNull,
    rc::Rc,
};

use allocator_api2::alloc::{AllocError, Allocator, Global};
use itertools::Itertools;
use strand_common::Error;
use strand_list::List;

/// Grants a fixed number of allocations and tracks the live ones.
#[derive(Debug, Clone, Default)]
struct Ration {
    left: Rc<Cell<usize>>,
    live: Rc<Cell<usize>>,
}

impl Ration {
    fn new(left: usize) -> Self {
        let ration = Self::default();
        ration.left.set(left);
        ration
    }

    fn grant(&self, n: usize) {
        self.left.set(self.left.get() + n);
    }

    fn live(&self) -> usize {
        self.live.get()
    }
}

unsafe impl Allocator for Ration {
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        if self.left.get() == 0 {
            return Err(AllocError);
        }
        self.left.set(self.left.get() - 1);
        self.live.set(self.live.get() + 1);
        Global.allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.live.set(self.live.get() - 1);
        Global.deallocate(ptr, layout)
    }
}

/// Panics when cloned after its countdown reaches zero.
#[derive(Debug, PartialEq)]
struct Fragile {
    id: usize,
    countdown: Rc<Cell<usize>>,
}

impl Clone for Fragile {
    fn clone(&self) -> Self {
        let n = self.countdown.get();
        if n == 0 {
            panic!("clone of {} failed", self.id);
        }
        self.countdown.set(n - 1);
        Self {
            id: self.id,
            countdown: self.countdown.clone(),
        }
    }
}

#[test_log::test]
fn test_allocation_failure_keeps_list() {
    let ration = Ration::new(3);
    let mut l = List::new_in(ration.clone());
    l.try_push_back_with(|| Ok(1)).unwrap();
    l.try_push_back_with(|| Ok(2)).unwrap();

    let res = l.try_push_back_with(|| Ok(3));
    assert!(matches!(res, Err(Error::Alloc { .. })));
    assert!(matches!(
        l.cursor_front_mut().try_insert_before_with(|| Ok(0)),
        Err(Error::Alloc { .. })
    ));
    assert_eq!(l.len(), 2);
    assert_eq!(l.iter().copied().collect_vec(), vec![1, 2]);
    assert!(l.is_ring_consistent());

    ration.grant(1);
    l.try_push_front_with(|| Ok(0)).unwrap();
    assert_eq!(l.iter().copied().collect_vec(), vec![0, 1, 2]);

    drop(l);
    assert_eq!(ration.live(), 0);
}

#[test_log::test]
fn test_failing_construction_releases_node() {
    let ration = Ration::new(8);
    let mut l = List::new_in(ration.clone());
    l.try_push_back_with(|| Ok("kept".to_string())).unwrap();
    assert_eq!(ration.live(), 2);

    let res = l.try_push_back_with(|| anyhow::bail!("refused"));
    assert!(matches!(res, Err(Error::Construct(_))));
    assert_eq!(ration.live(), 2);

    let res = catch_unwind(AssertUnwindSafe(|| {
        let _ = l
            .cursor_end_mut()
            .try_insert_before_with(|| -> anyhow::Result<String> { panic!("boom") });
    }));
    assert!(res.is_err());
    assert_eq!(ration.live(), 2);
    assert_eq!(l.len(), 1);
    assert!(l.is_ring_consistent());
}

#[test_log::test]
fn test_partial_build_is_unwound() {
    let ration = Ration::new(4);
    let res = List::try_from_iter_in((0..10).map(anyhow::Ok), ration.clone());
    assert!(matches!(res, Err(Error::Alloc { .. })));
    assert_eq!(ration.live(), 0);

    let ration = Ration::new(usize::MAX);
    let items = (0..10).map(|i| match i {
        7 => Err(anyhow::anyhow!("element {i} refused")),
        _ => Ok(i),
    });
    let res = List::try_from_iter_in(items, ration.clone());
    match res {
        Err(Error::Construct(e)) => assert_eq!(e.to_string(), "element 7 refused"),
        _ => panic!("expected construction failure"),
    }
    assert_eq!(ration.live(), 0);

    assert!(matches!(List::<u8, _>::try_new_in(Ration::new(0)), Err(Error::Alloc { .. })));
}

#[test]
fn test_failing_copy_assignment_keeps_target() {
    let countdown = Rc::new(Cell::new(usize::MAX));
    let source = (0..5)
        .map(|id| Fragile {
            id,
            countdown: countdown.clone(),
        })
        .collect::<List<_>>();
    let mut target = List::from([Fragile {
        id: 100,
        countdown: countdown.clone(),
    }]);

    countdown.set(3);
    let res = catch_unwind(AssertUnwindSafe(|| target.clone_from(&source)));
    assert!(res.is_err());
    assert_eq!(target.iter().map(|f| f.id).collect_vec(), vec![100]);
    assert!(target.is_ring_consistent());

    countdown.set(usize::MAX);
    target.clone_from(&source);
    assert_eq!(target, source);
}

#[test]
fn test_splice_between_allocator_clones() {
    let ration = Ration::new(usize::MAX);
    let mut a = List::new_in(ration.clone());
    let mut b = List::new_in(ration.clone());
    a.extend([1, 2]);
    b.extend([3, 4, 5]);
    a.append(&mut b);
    assert_eq!(a.iter().copied().collect_vec(), vec![1, 2, 3, 4, 5]);
    drop(a);
    drop(b);
    assert_eq!(ration.live(), 0);
}

#[test_log::test]
fn test_sort_with_exhausted_allocator() {
    let ration = Ration::new(4);
    let mut l = List::new_in(ration.clone());
    for x in [3, 1, 2] {
        l.try_push_back_with(|| Ok(x)).unwrap();
    }
    assert!(matches!(l.try_push_back_with(|| Ok(0)), Err(Error::Alloc { .. })));

    l.sort();
    assert_eq!(l.iter().copied().collect_vec(), vec![1, 2, 3]);
    l.sort_by(|a, b| a > b);
    assert_eq!(l.iter().copied().collect_vec(), vec![3, 2, 1]);
    assert!(l.is_ring_consistent());
    assert_eq!(ration.live(), 4);

    let ration = Ration::new(301);
    let mut l = List::new_in(ration.clone());
    for x in (0..300).rev() {
        l.try_push_back_with(|| Ok(x)).unwrap();
    }
    l.sort();
    assert_eq!(l.iter().copied().collect_vec(), (0..300).collect_vec());
    assert_eq!(ration.live(), 301);
}
