diesel::table! {
    especialidade_medica (descricao) {
        descricao -> Text,
    }
}

diesel::table! {
    dados_rela_visitas_medicos (data, medico) {
        data -> Date,
        medico -> Text,
        especialidade -> Text,
        municipio -> Text,
    }
}
