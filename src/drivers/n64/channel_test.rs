use std::error::Error;

use crate::drivers::n64::channel::{ChannelPool, Unavailable};

#[test]
fn test_acquire_priority_order() -> Result<(), Box<dyn Error>> {
    // Each lane only has room for one copy of the program
    let mut pool = ChannelPool::new(&[(32, 4), (32, 4)], 20);

    let first = pool.acquire(18)?;
    assert_eq!(first.lane, 0, "first port should land on lane A");
    assert_eq!(first.slot, 0);
    assert_eq!(first.offset, 0);
    assert_eq!(first.pin, 18);

    let second = pool.acquire(19)?;
    assert_eq!(second.lane, 1, "lane A is out of program space");
    assert_eq!(second.slot, 0);

    let third = pool.acquire(20);
    assert_eq!(third, Err(Unavailable::NoProgramSpace));

    Ok(())
}

#[test]
fn test_acquire_shares_lane_when_space_allows() -> Result<(), Box<dyn Error>> {
    let mut pool = ChannelPool::new(&[(32, 4), (32, 4)], 8);

    let first = pool.acquire(18)?;
    let second = pool.acquire(19)?;
    assert_eq!(first.lane, 0);
    assert_eq!(second.lane, 0, "lane A should be preferred while it has capacity");
    assert_eq!(second.slot, 1);
    assert_eq!(second.offset, 8, "program should load after the first copy");
    assert_eq!(pool.free_slots(), 6);

    Ok(())
}

#[test]
fn test_acquire_without_free_slot() {
    let mut pool = ChannelPool::new(&[(32, 1)], 8);
    assert!(pool.acquire(18).is_ok());
    assert_eq!(pool.acquire(19), Err(Unavailable::NoFreeSlot(0)));
    assert_eq!(pool.free_slots(), 0);
}

#[test]
fn test_failed_acquire_does_not_consume_program_space() -> Result<(), Box<dyn Error>> {
    // Lane A has space but no slots, lane B has both
    let mut pool = ChannelPool::new(&[(32, 0), (32, 1)], 16);
    let binding = pool.acquire(18)?;
    assert_eq!(binding.lane, 1, "lane without slots should be skipped");
    assert_eq!(binding.offset, 0);
    assert_eq!(pool.acquire(19), Err(Unavailable::NoFreeSlot(0)));

    Ok(())
}

#[test]
fn test_empty_pool() {
    let mut pool = ChannelPool::new(&[], 20);
    assert_eq!(pool.lane_count(), 0);
    assert_eq!(pool.acquire(18), Err(Unavailable::NoProgramSpace));
}

#[test]
fn test_reserve_claims_nothing_until_commit() -> Result<(), Box<dyn Error>> {
    let mut pool = ChannelPool::new(&[(32, 4)], 20);

    let reserved = pool.reserve(18)?;
    assert_eq!(pool.free_slots(), 4, "reserving should not claim a slot");
    let again = pool.reserve(19)?;
    assert_eq!(
        (again.lane, again.slot, again.offset),
        (reserved.lane, reserved.slot, reserved.offset),
        "same channel is offered again"
    );

    pool.commit(&reserved);
    assert_eq!(pool.free_slots(), 3);
    assert_eq!(pool.reserve(19), Err(Unavailable::NoProgramSpace));

    Ok(())
}
