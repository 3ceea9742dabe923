/// Base de los enlaces de navegación (Google Maps URLs, api=1)
pub const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/";
pub const MAPS_DIRECTIONS_URL: &str = "https://www.google.com/maps/dir/";

/// Separador de waypoints en el enlace de ruta completa
pub const WAYPOINT_SEPARATOR: &str = "|";

/// Valor mostrado en comprobantes para campos vacíos
pub const NOT_AVAILABLE: &str = "N/A";
