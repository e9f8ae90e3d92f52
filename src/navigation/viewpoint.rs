//! Named camera poses derived from the gallery layout.

use glam::Vec3;
use rustc_hash::FxHashMap;

use super::NavigationError;
use crate::options::{GalleryPosition, NavigationOptions};

/// Identifier of the viewpoint that frames the whole scene.
pub const OVERVIEW: &str = "overview";

/// A camera pose: where the eye sits and what it looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewpoint {
    /// Eye position in world space.
    pub eye: Vec3,
    /// Point the camera faces.
    pub look_at: Vec3,
}

impl Viewpoint {
    /// Pose that views `position` from `position + offset`.
    #[must_use]
    pub fn framing(position: Vec3, offset: Vec3) -> Self {
        Self {
            eye: position + offset,
            look_at: position,
        }
    }
}

/// Every navigable viewpoint, including [`OVERVIEW`].
#[derive(Debug, Clone)]
pub struct ViewpointTable {
    overview: Viewpoint,
    galleries: FxHashMap<String, Viewpoint>,
    order: Vec<String>,
}

impl ViewpointTable {
    /// Build the table from an overview pose and gallery anchors, each
    /// gallery viewed from `anchor + eye_offset`.
    ///
    /// A gallery named [`OVERVIEW`] is ignored; a repeated id keeps its
    /// last position.
    #[must_use]
    pub fn new(overview: Viewpoint, galleries: &[GalleryPosition], eye_offset: Vec3) -> Self {
        let mut table = Self {
            overview,
            galleries: FxHashMap::default(),
            order: Vec::with_capacity(galleries.len()),
        };
        for gallery in galleries {
            if gallery.id == OVERVIEW {
                log::warn!("Ignoring gallery named {OVERVIEW:?}: the id is reserved");
                continue;
            }
            let pose = Viewpoint::framing(Vec3::from(gallery.position), eye_offset);
            if table.galleries.insert(gallery.id.clone(), pose).is_none() {
                table.order.push(gallery.id.clone());
            }
        }
        table
    }

    /// Table described by navigation options.
    #[must_use]
    pub fn from_options(options: &NavigationOptions) -> Self {
        let overview = Viewpoint {
            eye: Vec3::from(options.overview_eye),
            look_at: Vec3::from(options.overview_look_at),
        };
        Self::new(
            overview,
            &options.galleries,
            Vec3::from(options.gallery_eye_offset),
        )
    }

    /// The overview pose.
    #[must_use]
    pub fn overview(&self) -> &Viewpoint {
        &self.overview
    }

    /// Pose for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::UnknownViewpoint`] if `id` is not in the
    /// table.
    pub fn get(&self, id: &str) -> Result<&Viewpoint, NavigationError> {
        if id == OVERVIEW {
            return Ok(&self.overview);
        }
        self.galleries
            .get(id)
            .ok_or_else(|| NavigationError::UnknownViewpoint { id: id.to_owned() })
    }

    /// True if `id` names a viewpoint.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        id == OVERVIEW || self.galleries.contains_key(id)
    }

    /// All ids: [`OVERVIEW`] first, then galleries in layout order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        std::iter::once(OVERVIEW).chain(self.order.iter().map(String::as_str))
    }

    /// Number of viewpoints, including the overview.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len() + 1
    }

    /// Always false: the overview is always present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}
