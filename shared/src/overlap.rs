use crate::contact::FingerContacts;
use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};
use rapier3d::{parry::query, prelude::SharedShape};

/// Collider shapes used for hand probes and finger tips.
#[derive(Clone, Debug, PartialEq)]
pub enum ContactShapeDef {
    /// Sphere/ball (meters).
    Sphere { radius: f32 },

    /// Y-aligned capsule (meters).
    CapsuleY { radius: f32, half_height: f32 },

    /// Oriented box with given half-extents (meters).
    Cuboid { half_extents: Vector3<f32> },
}

impl ContactShapeDef {
    /// Radius of a sphere centered on the shape origin that encloses the whole shape.
    pub fn bounding_radius(&self) -> f32 {
        match self {
            ContactShapeDef::Sphere { radius } => *radius,
            ContactShapeDef::CapsuleY {
                radius,
                half_height,
            } => radius + half_height,
            ContactShapeDef::Cuboid { half_extents } => half_extents.norm(),
        }
    }
}

pub fn shape_from_def(def: &ContactShapeDef) -> SharedShape {
    match def {
        ContactShapeDef::Sphere { radius } => SharedShape::ball(*radius),
        ContactShapeDef::CapsuleY {
            radius,
            half_height,
        } => SharedShape::capsule_y(*half_height, *radius),
        ContactShapeDef::Cuboid { half_extents } => {
            SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z)
        }
    }
}

/// A posed collider, ready for intersection tests.
#[derive(Clone)]
pub struct ContactVolume {
    shape: SharedShape,
    pose: Isometry3<f32>,
}

impl ContactVolume {
    pub fn new(def: &ContactShapeDef, pose: Isometry3<f32>) -> Self {
        Self {
            shape: shape_from_def(def),
            pose,
        }
    }

    pub fn from_parts(
        def: &ContactShapeDef,
        translation: Vector3<f32>,
        rotation: UnitQuaternion<f32>,
    ) -> Self {
        Self::new(
            def,
            Isometry3::from_parts(Translation3::from(translation), rotation),
        )
    }

    pub fn pose(&self) -> &Isometry3<f32> {
        &self.pose
    }

    /// True when the two volumes touch or interpenetrate.
    ///
    /// Unsupported shape pairs count as "not touching".
    pub fn intersects(&self, other: &ContactVolume) -> bool {
        query::intersection_test(&self.pose, &*self.shape, &other.pose, &*other.shape)
            .unwrap_or(false)
    }
}

/// Owner names of every candidate currently intersecting `probe`.
pub fn overlapping_names<'a, I>(probe: &'a ContactVolume, candidates: I) -> impl Iterator<Item = &'a str>
where
    I: IntoIterator<Item = (&'a str, &'a ContactVolume)>,
    I::IntoIter: 'a,
{
    candidates
        .into_iter()
        .filter(move |(_, volume)| probe.intersects(volume))
        .map(|(name, _)| name)
}

/// Samples one hand: which finger colliders overlap the probe right now.
pub fn sample_contacts<'a, I>(probe: &'a ContactVolume, candidates: I) -> FingerContacts
where
    I: IntoIterator<Item = (&'a str, &'a ContactVolume)>,
    I::IntoIter: 'a,
{
    FingerContacts::from_names(overlapping_names(probe, candidates))
}
