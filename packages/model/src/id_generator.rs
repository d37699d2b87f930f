use uuid::Uuid;

/// Generate an opaque entity id
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let id1 = new_id();
        let id2 = new_id();

        assert_ne!(id1, id2);
        assert!(!id1.is_empty());
    }
}
