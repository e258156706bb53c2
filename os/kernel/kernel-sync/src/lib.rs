//! # Kernel synchronization primitives
//!
//! Early boot runs on a single CPU with interrupts off, so the only primitive
//! needed at that stage is a write-once cell: [`FreezeCell`] turns the state
//! produced during boot negotiation into process-wide, read-only data.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

mod freeze_cell;

pub use freeze_cell::FreezeCell;
