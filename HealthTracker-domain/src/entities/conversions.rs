use health_tracker_data::models::health_record as data;

use crate::entities::health_record::{CreateHealthRecordRequest, HealthRecord};

// Conversion functions between domain entities and data models.
// Named convert_to_[target_layer]_[model_name].

/// Convert a stored row into the domain entity
pub fn convert_to_domain_record(record: data::HealthRecord) -> HealthRecord {
    HealthRecord {
        id: record.id,
        date: record.date,
        weight: record.weight,
        systolic: record.systolic,
        diastolic: record.diastolic,
    }
}

/// Convert a create request into an insertable row.
///
/// The date is left unset so storage stamps the insert time.
pub fn convert_to_data_new_record(request: &CreateHealthRecordRequest) -> data::NewHealthRecord {
    data::NewHealthRecord {
        date: None,
        weight: request.weight,
        systolic: request.systolic,
        diastolic: request.diastolic,
    }
}
