//! HTTP-level integration tests for the OrderHub API.

mod campaign_test;
mod health_test;
mod helpers;
mod order_test;
mod seed_test;
