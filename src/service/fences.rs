use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::{
    error::AttendanceError,
    model::geofence::{GeoFence, NewGeoFence},
};

/// Every fence ever configured. Fences are superseded, never removed.
#[derive(Debug, Default)]
pub struct FenceRegistry {
    fences: Vec<GeoFence>,
}

impl FenceRegistry {
    pub fn active(&self) -> Option<&GeoFence> {
        self.fences.iter().find(|f| f.active)
    }

    pub fn history(&self) -> &[GeoFence] {
        &self.fences
    }

    /// Installs `new` as the only active fence.
    ///
    /// Validation happens before anything is deactivated, so a rejected fence
    /// leaves the registry untouched.
    pub fn replace_active(
        &mut self,
        new: NewGeoFence,
        at: DateTime<Utc>,
    ) -> Result<GeoFence, AttendanceError> {
        new.validate()?;
        Ok(self.install(format!("fence-{}", Uuid::new_v4()), new, at))
    }

    pub(crate) fn install(&mut self, id: String, new: NewGeoFence, at: DateTime<Utc>) -> GeoFence {
        for fence in self.fences.iter_mut().filter(|f| f.active) {
            fence.active = false;
            info!(fence_id = %fence.id, "Geofence deactivated");
        }

        let fence = GeoFence {
            id,
            name: new.name.trim().to_string(),
            center: new.center,
            radius_km: new.radius_km,
            active: true,
            created_at: at,
        };
        self.fences.push(fence.clone());

        info!(
            fence_id = %fence.id,
            name = %fence.name,
            center = %fence.center,
            radius_km = fence.radius_km,
            "Geofence activated"
        );
        fence
    }
}
