mod faults;
mod session;
