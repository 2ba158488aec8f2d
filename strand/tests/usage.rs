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

use itertools::Itertools;
use strand::prelude::*;

#[derive(Debug)]
struct Job {
    priority: u8,
    name: &'static str,
}

#[test_log::test]
fn test_schedule_by_priority() {
    let mut backlog: List<Job> = [(2, "index"), (1, "fetch"), (2, "compact"), (0, "boot")]
        .into_iter()
        .map(|(priority, name)| Job { priority, name })
        .collect();
    backlog.sort_by_key(|job| job.priority);

    let mut queue = Queue::from_container(backlog);
    assert_eq!(queue.front().map(|job| job.name), Some("boot"));
    queue.pop();
    let order = queue.into_inner().into_iter().map(|job| job.name).collect_vec();
    assert_eq!(order, vec!["fetch", "index", "compact"]);
}

#[test_log::test]
fn test_cursor_edit_then_stack() -> anyhow::Result<()> {
    let mut list = List::from([1, 2, 4, 4, 5]);
    {
        let mut cursor = list.cursor_at_mut(2)?;
        cursor.insert_before(3);
    }
    assert_eq!(list.unique(), 1);

    let mut stack = Stack::<i32, Vector<i32>>::from_container(list.iter().copied().collect());
    assert_eq!(stack.top(), Some(&5));
    stack.push(6);
    assert_eq!(stack.into_inner().as_slice(), &[1, 2, 3, 4, 5, 6]);
    Ok(())
}

#[test]
fn test_out_of_range_is_reported() {
    let list = List::from([1, 2, 3]);
    let err = list.cursor_at(5).map(|_| ()).unwrap_err();
    assert!(matches!(err, Error::OutOfRange { index: 5, len: 3 }));

    let vector = Vector::from([1]);
    assert_eq!(vector.at(1).unwrap_err().to_string(), "position 1 is out of range for length 1");
}
