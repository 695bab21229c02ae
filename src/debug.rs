impl std::fmt::Debug for crate::submodels::binary::Individual {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Individual")
            .field("variant", &self.variant)
            .field("high_status", &self.high_status)
            .finish()
    }
}

impl std::fmt::Debug for crate::submodels::rogers::Learner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Learner")
            .field("strategy", &self.strategy)
            .field("behaviour", &self.behaviour)
            .field("fitness", &format_args!("{:.3}", self.fitness))
            .finish()
    }
}

impl std::fmt::Debug for crate::submodels::interdependence::Repertoire {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repertoire")
            .field("traits", &format_args!("{:b}", self))
            .finish()
    }
}
