#![no_std]

// Shared logic for the toaster oven controller.
//
// Everything timing-sensitive or event-driven lives here so the same state
// machine runs unchanged on the STM32 firmware and inside the host emulator.
// Interrupt-facing types only use `portable-atomic`, which keeps them usable
// from `static` items on cores without native compare-and-swap.

pub mod buttons;
pub mod config;
pub mod display;
pub mod event_loop;
pub mod handoff;
pub mod oven;
pub mod progress;
pub mod sensor;
pub mod timebase;
