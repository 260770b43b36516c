//! Event log database schema.

/// SQL to create the workflow events table.
pub const CREATE_WORKFLOW_EVENTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS workflow_events (
    event_id    UUID PRIMARY KEY,
    event_type  VARCHAR(255) NOT NULL,
    payload     JSONB NOT NULL,
    origin      VARCHAR(255) NOT NULL,
    actor_id    UUID,
    occurred_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    processed   BOOLEAN NOT NULL DEFAULT FALSE,
    listeners   JSONB NOT NULL DEFAULT '[]'
);

CREATE INDEX IF NOT EXISTS idx_workflow_events_type_occurred
    ON workflow_events (event_type, occurred_at DESC);

CREATE INDEX IF NOT EXISTS idx_workflow_events_origin
    ON workflow_events (origin);

CREATE INDEX IF NOT EXISTS idx_workflow_events_pending
    ON workflow_events (occurred_at)
    WHERE NOT processed;
";
