//! Integration test entry point.

mod helpers;

mod backchannel_test;
mod events_test;
