use std::cell::RefCell;
use std::rc::Rc;

use tasksim_core::{Container, Semaphore, Simulation};

#[test]
fn container_immediate_get_and_put() {
    let mut sim = Simulation::new();
    let ctx = sim.context();
    let ram = Container::new(ctx.clone(), 1000, 1000);

    let grant = ram.get(400);
    assert!(grant.is_triggered());
    assert_eq!(ram.level(), 600);

    let back = ram.put(400);
    assert!(back.is_triggered());
    assert_eq!(ram.level(), 1000);

    sim.step_until_no_events();
    assert_eq!(sim.time(), 0.0);
}

#[test]
fn container_zero_amount_completes_without_queueing() {
    let sim = Simulation::new();
    let ctx = sim.context();
    let ram = Container::new(ctx.clone(), 10, 0);

    // Level is 0, yet a zero-sized get must not block.
    assert!(ram.get(0).is_triggered());
    assert_eq!(ram.level(), 0);
    assert!(ram.put(0).is_triggered());
    assert_eq!(ram.level(), 0);
}

#[test]
fn container_serves_queued_gets_in_fifo_order() {
    let mut sim = Simulation::new();
    let ctx = sim.context();
    let ram = Rc::new(Container::new(ctx.clone(), 100, 100));
    let order = Rc::new(RefCell::new(Vec::new()));

    // Occupy everything, release at t=5.
    {
        let ctx = sim.context();
        let ram = ram.clone();
        sim.spawn(async move {
            ram.get(100).wait().await;
            ctx.sleep(5.0).await;
            ram.put(100);
        });
    }

    // Two identical gets issued at the same instant; submission order wins.
    for name in ["first", "second"] {
        let ctx = sim.context();
        let ram = ram.clone();
        let order = order.clone();
        sim.spawn(async move {
            ram.get(60).wait().await;
            order.borrow_mut().push((name, ctx.time()));
            ctx.sleep(1.0).await;
            ram.put(60);
        });
    }

    sim.step_until_no_events();

    assert_eq!(order.borrow()[0], ("first", 5.0));
    assert_eq!(order.borrow()[1], ("second", 6.0));
    assert_eq!(ram.level(), 100);
}

#[test]
fn container_head_of_line_blocks_later_waiters() {
    let mut sim = Simulation::new();
    let ctx = sim.context();
    let ram = Rc::new(Container::new(ctx.clone(), 100, 0));
    let order = Rc::new(RefCell::new(Vec::new()));

    // Head wants 80, a later waiter only 10. A put of 20 satisfies the
    // second but must not be allowed to jump the queue.
    for (name, amount) in [("big", 80u64), ("small", 10u64)] {
        let ctx = sim.context();
        let ram = ram.clone();
        let order = order.clone();
        sim.spawn(async move {
            ram.get(amount).wait().await;
            order.borrow_mut().push((name, ctx.time()));
        });
    }

    {
        let ctx = sim.context();
        let ram = ram.clone();
        sim.spawn(async move {
            ctx.sleep(1.0).await;
            ram.put(20);
            ctx.sleep(1.0).await;
            ram.put(80);
        });
    }

    sim.step_until_no_events();

    assert_eq!(*order.borrow(), vec![("big", 2.0), ("small", 2.0)]);
    assert_eq!(ram.level(), 10);
}

#[test]
fn container_skips_aborted_head() {
    let mut sim = Simulation::new();
    let ctx = sim.context();
    let ram = Rc::new(Container::new(ctx.clone(), 100, 0));

    let doomed = ram.get(50);
    let live = ram.get(30);
    doomed.abort();

    ram.put(30);
    sim.step_until_no_events();

    assert!(live.is_triggered());
    assert!(doomed.is_aborted());
    assert_eq!(ram.level(), 0);
}

#[test]
fn container_blocked_put_waits_for_room() {
    let mut sim = Simulation::new();
    let ctx = sim.context();
    let ram = Rc::new(Container::new(ctx.clone(), 100, 90));
    let order = Rc::new(RefCell::new(Vec::new()));

    {
        let ctx = sim.context();
        let ram = ram.clone();
        let order = order.clone();
        sim.spawn(async move {
            ram.put(50).wait().await;
            order.borrow_mut().push(("put done", ctx.time()));
        });
    }

    {
        let ctx = sim.context();
        let ram = ram.clone();
        sim.spawn(async move {
            ctx.sleep(4.0).await;
            ram.get(40);
        });
    }

    sim.step_until_no_events();

    assert_eq!(*order.borrow(), vec![("put done", 4.0)]);
    assert_eq!(ram.level(), 100);
}

#[test]
#[should_panic(expected = "exceeds container capacity")]
fn container_get_over_capacity_panics() {
    let sim = Simulation::new();
    let ram = Container::new(sim.context(), 100, 100);
    let _ = ram.get(101);
}

#[test]
#[should_panic(expected = "initial level")]
fn container_init_over_capacity_panics() {
    let sim = Simulation::new();
    let _ = Container::new(sim.context(), 100, 101);
}

#[test]
fn semaphore_grants_in_fifo_order() {
    let mut sim = Simulation::new();
    let ctx = sim.context();
    let cpu = Rc::new(Semaphore::new(ctx.clone(), 1));
    let order = Rc::new(RefCell::new(Vec::new()));

    for name in ["a", "b", "c"] {
        let ctx = sim.context();
        let cpu = cpu.clone();
        let order = order.clone();
        sim.spawn(async move {
            let token = cpu.request().await;
            order.borrow_mut().push((name, ctx.time()));
            ctx.sleep(2.0).await;
            cpu.release(token);
        });
    }

    sim.step_until_no_events();

    assert_eq!(*order.borrow(), vec![("a", 0.0), ("b", 2.0), ("c", 4.0)]);
    assert_eq!(cpu.available(), 1);
}

#[test]
fn semaphore_counts_multiple_slots() {
    let mut sim = Simulation::new();
    let ctx = sim.context();
    let cpu = Rc::new(Semaphore::new(ctx.clone(), 2));
    let order = Rc::new(RefCell::new(Vec::new()));

    for name in ["a", "b", "c"] {
        let ctx = sim.context();
        let cpu = cpu.clone();
        let order = order.clone();
        sim.spawn(async move {
            let token = cpu.request().await;
            order.borrow_mut().push((name, ctx.time()));
            ctx.sleep(3.0).await;
            cpu.release(token);
        });
    }

    sim.step_until_no_events();

    // Two slots run concurrently, the third waits for the first release.
    assert_eq!(*order.borrow(), vec![("a", 0.0), ("b", 0.0), ("c", 3.0)]);
    assert_eq!(cpu.available(), 2);
}

#[test]
fn release_then_put_wakes_waiters_in_that_order() {
    let mut sim = Simulation::new();
    let ctx = sim.context();
    let cpu = Rc::new(Semaphore::new(ctx.clone(), 1));
    let ram = Rc::new(Container::new(ctx.clone(), 10, 10));
    let order = Rc::new(RefCell::new(Vec::new()));

    // Occupies both resources, then frees the CPU slot before putting the
    // RAM back, at the same instant.
    {
        let ctx = sim.context();
        let cpu = cpu.clone();
        let ram = ram.clone();
        sim.spawn(async move {
            ram.get(10).wait().await;
            let token = cpu.request().await;
            ctx.sleep(5.0).await;
            cpu.release(token);
            ram.put(10);
        });
    }

    // Blocked on the CPU slot.
    {
        let ctx = sim.context();
        let cpu = cpu.clone();
        let order = order.clone();
        sim.spawn(async move {
            ctx.sleep(1.0).await;
            let token = cpu.request().await;
            order.borrow_mut().push(("cpu waiter", ctx.time()));
            cpu.release(token);
        });
    }

    // Blocked on RAM.
    {
        let ctx = sim.context();
        let ram = ram.clone();
        let order = order.clone();
        sim.spawn(async move {
            ctx.sleep(1.0).await;
            ram.get(1).wait().await;
            order.borrow_mut().push(("ram waiter", ctx.time()));
            ram.put(1);
        });
    }

    sim.step_until_no_events();

    // Both wake at t=5, but the CPU slot was freed first.
    assert_eq!(
        *order.borrow(),
        vec![("cpu waiter", 5.0), ("ram waiter", 5.0)]
    );
}

#[test]
#[should_panic(expected = "released more times than acquired")]
fn semaphore_rejects_foreign_token() {
    let mut sim = Simulation::new();
    let ctx = sim.context();
    let left = Rc::new(Semaphore::new(ctx.clone(), 1));
    let right = Rc::new(Semaphore::new(ctx.clone(), 1));

    {
        let left = left.clone();
        let right = right.clone();
        sim.spawn(async move {
            let token = left.request().await;
            // All of `right`'s slots are free; returning a stray token there
            // must trip the accounting check.
            right.release(token);
        });
    }

    sim.step_until_no_events();
}
