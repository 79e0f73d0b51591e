use std::collections::BTreeMap;

/// Label selecting the pods of an app.
pub fn selector_labels(app: &str) -> Option<BTreeMap<String, String>> {
    Some(BTreeMap::from([("app".to_owned(), app.to_owned())]))
}

/// Labels that indicate the resource is managed by the DNS operator bundle.
pub fn managed_labels() -> Option<BTreeMap<String, String>> {
    Some(BTreeMap::from([(
        "managed-by".to_owned(),
        "clustergen".to_owned(),
    )]))
}

/// Extend the managed labels with the selector labels of an app.
pub fn app_labels(app: &str) -> Option<BTreeMap<String, String>> {
    let mut labels = managed_labels().unwrap_or_default();
    labels.extend(selector_labels(app).unwrap_or_default());
    Some(labels)
}
