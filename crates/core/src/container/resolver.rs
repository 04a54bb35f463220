use crate::container::autowiring::Constructor;
use crate::container::registry::BindingRegistry;

/// Score of one constructor against the current bindings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorScore {
    /// Position in the type's constructor list
    pub index: usize,
    pub name: &'static str,
    pub parameter_count: usize,
    /// Parameters whose type has a binding
    pub bound_count: usize,
    /// `parameter_count + bound_count`
    pub score: usize,
    /// Whether `get` picks this constructor
    pub selected: bool,
}

/// Picks the constructor to build a type with
pub struct ConstructorResolver<'a> {
    bindings: &'a BindingRegistry,
}

impl<'a> ConstructorResolver<'a> {
    pub fn new(bindings: &'a BindingRegistry) -> Self {
        Self { bindings }
    }

    /// One point per parameter, plus one per bound parameter
    pub fn score<T>(&self, constructor: &Constructor<T>) -> usize {
        constructor.parameter_count() + self.bound_count(constructor)
    }

    fn bound_count<T>(&self, constructor: &Constructor<T>) -> usize {
        constructor
            .parameters()
            .iter()
            .filter(|parameter| self.bindings.contains(parameter.key.type_id))
            .count()
    }

    /// Index of the highest scoring constructor.
    ///
    /// Ties go to the earliest constructor in the list.
    pub fn select<T>(&self, constructors: &[Constructor<T>]) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;

        for (index, constructor) in constructors.iter().enumerate() {
            let score = self.score(constructor);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((index, score));
            }
        }

        best.map(|(index, _)| index)
    }

    /// Scores of every constructor, marking the one `select` returns
    pub fn explain<T>(&self, constructors: &[Constructor<T>]) -> Vec<ConstructorScore> {
        let selected = self.select(constructors);

        constructors
            .iter()
            .enumerate()
            .map(|(index, constructor)| {
                let bound_count = self.bound_count(constructor);
                ConstructorScore {
                    index,
                    name: constructor.name(),
                    parameter_count: constructor.parameter_count(),
                    bound_count,
                    score: constructor.parameter_count() + bound_count,
                    selected: selected == Some(index),
                }
            })
            .collect()
    }
}
