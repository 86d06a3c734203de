mod helpers;
mod mocks;

mod cart;
mod checkout;
mod webhook;
