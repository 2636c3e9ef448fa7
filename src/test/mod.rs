mod test_as_node;
mod test_simulator;
