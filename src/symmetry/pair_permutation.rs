use crate::{
    encoding::PairIndex,
    error::{CoverError, Result},
    metric::DistanceType,
};

/// A permutation of pair identifiers, stored as the array of the images.
///
/// Applying the permutation is a plain array lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairPermutation(Vec<usize>);

impl PairPermutation {
    /// Returns the identity permutation on `n` elements.
    pub fn identity(n: usize) -> Self {
        Self((0..n).collect())
    }

    /// Builds a permutation from the images of `0..images.len()`.
    ///
    /// A configuration error is returned if the images do not form a permutation.
    pub fn from_images(images: Vec<usize>) -> Result<Self> {
        check_bijection(&images).map_err(CoverError::configuration)?;
        Ok(Self(images))
    }

    /// Returns the number of elements the permutation acts on.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` iff the permutation acts on no element.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the image of an element.
    pub fn apply(&self, x: usize) -> usize {
        self.0[x]
    }

    /// Returns the images of all the elements.
    pub fn images(&self) -> &[usize] {
        &self.0
    }

    /// Returns `true` iff this is the identity.
    pub fn is_identity(&self) -> bool {
        self.0.iter().enumerate().all(|(i, x)| i == *x)
    }

    /// Returns the first element moved by the permutation, if any.
    pub fn first_moved(&self) -> Option<usize> {
        self.0.iter().enumerate().find(|(i, x)| i != *x).map(|(i, _)| i)
    }

    /// Returns the composition `self ∘ other`, that is the permutation applying `other` first.
    pub fn compose(&self, other: &PairPermutation) -> PairPermutation {
        PairPermutation(other.0.iter().map(|x| self.0[*x]).collect())
    }

    /// Returns the inverse permutation.
    pub fn inverse(&self) -> PairPermutation {
        let mut inverse = vec![0; self.0.len()];
        self.0.iter().enumerate().for_each(|(i, x)| inverse[*x] = i);
        PairPermutation(inverse)
    }
}

fn check_bijection(images: &[usize]) -> std::result::Result<(), String> {
    let mut seen = vec![false; images.len()];
    for (i, x) in images.iter().enumerate() {
        if *x >= images.len() {
            return Err(format!(
                "{} is mapped to {}, which is out of bounds",
                i, x
            ));
        }
        if seen[*x] {
            return Err(format!("{} is the image of several elements", x));
        }
        seen[*x] = true;
    }
    Ok(())
}

/// Lifts a permutation of points to the induced permutation of pair identifiers.
///
/// The generator is checked to be a bijection of the points, and to map each pair to a pair of the same distance class.
/// The `generator_index` is only used to give context to the errors.
pub fn lift_generator<D>(
    index: &PairIndex<D>,
    generator: &[usize],
    generator_index: usize,
) -> Result<PairPermutation>
where
    D: DistanceType,
{
    if generator.len() != index.n_points() {
        return Err(CoverError::configuration(format!(
            "generator {} has {} images while the space has {} points",
            generator_index,
            generator.len(),
            index.n_points()
        )));
    }
    check_bijection(generator).map_err(|e| {
        CoverError::configuration(format!(
            "generator {} is not a permutation of the points: {}",
            generator_index, e
        ))
    })?;
    let images = index
        .iter_pairs()
        .enumerate()
        .map(|(id, pair)| {
            let image = index.pair_id(generator[pair.first()], generator[pair.second()]);
            if index.class_of(id) == index.class_of(image) {
                Ok(image)
            } else {
                Err(CoverError::configuration(format!(
                    "generator {} does not preserve distances: it maps the pair {} (distance {}) to the pair {} (distance {})",
                    generator_index,
                    pair,
                    index.distance_classes()[index.class_of(id)].distance(),
                    index.pair(image),
                    index.distance_classes()[index.class_of(image)].distance(),
                )))
            }
        })
        .collect::<Result<Vec<usize>>>()?;
    Ok(PairPermutation(images))
}
