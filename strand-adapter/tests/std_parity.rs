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

//! Adapters compared step by step against std collections holding the same elements.

use std::collections::VecDeque;

use strand_adapter::{FrontSequence, Queue, Sequence, Stack};
use strand_list::List;
use strand_vector::Vector;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Person {
    name: String,
    surname: String,
}

fn person(name: &str, surname: &str) -> Person {
    Person {
        name: name.to_string(),
        surname: surname.to_string(),
    }
}

fn seed() -> Vec<Person> {
    vec![person("Alfa", "Omega"), person("Delta", "Theta"), person("union", "except")]
}

fn swap_seed() -> Vec<Person> {
    vec![person("1", "2"), person("3", "4"), person("5", "6")]
}

fn check_stack<S>(mut stack: Stack<Person, S>, mut model: Vec<Person>)
where
    S: Sequence<Item = Person>,
{
    assert_eq!(stack.len(), model.len());
    while let Some(expected) = model.pop() {
        assert_eq!(stack.top(), Some(&expected));
        assert_eq!(stack.pop(), Some(expected));
    }
    assert!(stack.is_empty());
}

fn check_queue<S>(mut queue: Queue<Person, S>, mut model: VecDeque<Person>)
where
    S: FrontSequence<Item = Person>,
{
    assert_eq!(queue.len(), model.len());
    while let Some(expected) = model.pop_front() {
        assert_eq!(queue.front(), Some(&expected));
        assert_eq!(queue.len(), model.len() + 1);
        assert_eq!(queue.pop(), Some(expected));
    }
    assert!(queue.is_empty());
}

fn stack_parity<S>()
where
    S: Sequence<Item = Person> + FromIterator<Person> + Clone,
{
    let newcomer = person("Maron", "Kubanov");
    let mut a = Stack::from_container(seed().into_iter().collect::<S>());
    let mut b = seed();
    check_stack(a.clone(), b.clone());

    a.push(newcomer.clone());
    b.push(newcomer);
    check_stack(a.clone(), b.clone());

    a.push(person("232", "3232"));
    b.push(person("232", "3232"));
    check_stack(a.clone(), b.clone());

    let mut for_swap = Stack::from_container(swap_seed().into_iter().collect::<S>());
    let mut model_for_swap = swap_seed();
    for_swap.swap(&mut a);
    std::mem::swap(&mut model_for_swap, &mut b);
    check_stack(a, b);
    check_stack(for_swap, model_for_swap);
}

#[test_log::test]
fn test_stack_over_list() {
    stack_parity::<List<Person>>();
}

#[test_log::test]
fn test_stack_over_vector() {
    stack_parity::<Vector<Person>>();
}

#[test_log::test]
fn test_queue_over_list() {
    let newcomer = person("Maron", "Kubanov");
    let mut a: Queue<Person> = seed().into_iter().collect();
    let mut b: VecDeque<Person> = seed().into();
    check_queue(a.clone(), b.clone());

    a.push(newcomer.clone());
    b.push_back(newcomer);
    check_queue(a.clone(), b.clone());

    a.push(person("232", "3232"));
    b.push_back(person("232", "3232"));
    assert_eq!(a.back(), b.back());
    check_queue(a.clone(), b.clone());

    let mut for_swap = Queue::from_container(swap_seed().into_iter().collect::<List<_>>());
    let mut model_for_swap: VecDeque<Person> = swap_seed().into();
    for_swap.swap(&mut a);
    std::mem::swap(&mut model_for_swap, &mut b);
    check_queue(a, b);
    check_queue(for_swap, model_for_swap);
}
