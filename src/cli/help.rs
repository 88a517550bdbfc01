const TOPICS: [&str; 9] = [
    "EOF", "all", "count", "create", "destroy", "help", "quit", "show", "update",
];

/// Help text for one command, or the topic list when `topic` is `None`.
pub fn help_text(topic: Option<&str>) -> String {
    match topic {
        None => format!(
            "\nDocumented commands (type help <topic>):\n========================================\n{}\n",
            TOPICS.join("  ")
        ),
        Some("quit") => "Exits the program with formatting\n".to_string(),
        Some("EOF") => "Exits the program without formatting\n".to_string(),
        Some("help") => "List available commands with \"help\" or detailed help with \"help cmd\".\n".to_string(),
        Some("create") => "Creates an instance of a class\n\
            Usage: create <className> [<attribute1=value1> <attribute2=value2> ...]\n"
            .to_string(),
        Some("show") => "Shows the details of an instance\n\
            Usage: show <className> <objectId>\n\
            Usage: <className>.show(<objectId>)\n"
            .to_string(),
        Some("destroy") => "Destroys an instance\n\
            Usage: destroy <className> <objectId>\n\
            Usage: <className>.destroy(<objectId>)\n"
            .to_string(),
        Some("all") => "Shows all instances, or instances of a specific class\n\
            Usage: all [className]\n\
            Usage: <className>.all()\n"
            .to_string(),
        Some("count") => "Count the number of instances of a class\n\
            Usage: count <className>\n\
            Usage: <className>.count()\n"
            .to_string(),
        Some("update") => "Updates an instance with new information\n\
            Usage: update <className> <objectId> <attributeName> <attributeValue>\n\
            Usage: <className>.update(<objectId>, <attributeName>, <attributeValue>)\n\
            Usage: <className>.update(<objectId>, <dictionary>)\n"
            .to_string(),
        Some(other) => format!("*** No help on {}", other),
    }
}
