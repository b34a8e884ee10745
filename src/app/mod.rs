pub mod dispatch;
mod reset;
