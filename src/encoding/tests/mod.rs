mod tests_collections;
mod tests_limits;
mod tests_primitives;
