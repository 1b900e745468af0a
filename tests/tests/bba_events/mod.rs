mod shared_bus;
